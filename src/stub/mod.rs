//! # Loopback Service
//!
//! A local stand-in for the remote API that honours the wire contract and
//! nothing more. No secret sharing happens here:
//!
//! - `POST /api/v1/encrypt` packs the uploaded image as *both* shares, next to
//!   a placeholder recovery blob.
//! - `POST /api/v1/decrypt` checks the package and returns `share1.png`.
//!
//! Encoding then decoding through it therefore hands back the original image,
//! which is enough to drive the client end to end.

use axum::{
    extract::multipart::Multipart,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use log::{error, info};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::bundle::{self, BundleArchive, Member};
use crate::client::transfer::{ApiStatus, DECRYPT_PATH, ENCRYPT_PATH, IMAGE_FIELD, PACKAGE_FIELD};
use crate::common::media::{Blob, MediaType};

/// Stand-in for the service's `.npy` recovery file: the numpy magic only.
pub const PLACEHOLDER_RECOVERY: &[u8] = b"\x93NUMPY\x01\x00";

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

type Rejection = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, detail: impl Into<String>) -> Rejection {
    let detail = detail.into();
    error!("❌ {}", detail);
    (status, Json(ErrorResponse { detail }))
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(health_check))
        .route(ENCRYPT_PATH, post(encrypt_handler))
        .route(DECRYPT_PATH, post(decrypt_handler))
        .layer(CorsLayer::permissive())
}

/// Serve [`router`] on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, router()).await
}

async fn health_check() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "healthy".to_string(),
        message: "SecureVision loopback service is running".to_string(),
    })
}

/// Pull one named file field out of a multipart body.
async fn read_field(
    multipart: &mut Multipart,
    wanted: &str,
) -> Result<Option<(String, Vec<u8>)>, Rejection> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        reject(
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        if field.name() != Some(wanted) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            reject(
                StatusCode::BAD_REQUEST,
                format!("Failed to read {}: {}", wanted, e),
            )
        })?;
        return Ok(Some((file_name, data.to_vec())));
    }
    Ok(None)
}

async fn encrypt_handler(mut multipart: Multipart) -> Result<impl IntoResponse, Rejection> {
    let (file_name, data) = read_field(&mut multipart, IMAGE_FIELD)
        .await?
        .ok_or_else(|| reject(StatusCode::UNPROCESSABLE_ENTITY, "No image provided"))?;

    if data.is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "Invalid image"));
    }
    info!("📥 Encrypt request: {} ({} bytes)", file_name, data.len());

    let share = Blob::new(Member::Share1.file_name(), MediaType::Png, data);
    let recovery = Blob::new(
        Member::Recovery.file_name(),
        MediaType::OctetStream,
        PLACEHOLDER_RECOVERY.to_vec(),
    );
    let archive = bundle::encode_bundle(Some(&share), Some(&share), Some(&recovery))
        .map_err(|e| reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, MediaType::Zip.mime().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", bundle::PACKAGE_FILE_NAME),
            ),
        ],
        archive.bytes().to_vec(),
    ))
}

async fn decrypt_handler(mut multipart: Multipart) -> Result<impl IntoResponse, Rejection> {
    let (file_name, data) = read_field(&mut multipart, PACKAGE_FIELD)
        .await?
        .ok_or_else(|| reject(StatusCode::UNPROCESSABLE_ENTITY, "No package provided"))?;

    if !file_name.ends_with(".zip") {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "Please provide a ZIP file containing shares and recovery data",
        ));
    }
    info!("📥 Decrypt request: {} ({} bytes)", file_name, data.len());

    let bundle = bundle::decode_bundle(&BundleArchive::new(file_name, data))
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, MediaType::Png.mime().to_string())],
        bundle.share1.bytes().to_vec(),
    ))
}
