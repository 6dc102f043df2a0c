//! # Transfer Client
//!
//! The two remote exchanges, one multipart POST each:
//!
//! ```text
//! POST /api/v1/encrypt   image=<image bytes>                  -> zip archive
//! POST /api/v1/decrypt   encrypted_package=<archive bytes>    -> reconstructed image
//! ```
//!
//! Each call is a single attempt. There is no retry, no backoff and no cache;
//! the transport's own timeout is the only one. Any non-2xx status becomes
//! [`ShareError::RemoteRejected`] and the body is ignored.

use log::{error, info};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::{Deserialize, Serialize};

use crate::bundle::{BundleArchive, PACKAGE_FILE_NAME};
use crate::common::config::ApiConfig;
use crate::common::error::{Result, ShareError};
use crate::common::media::{Blob, MediaType};

pub const ENCRYPT_PATH: &str = "/api/v1/encrypt";
pub const DECRYPT_PATH: &str = "/api/v1/decrypt";

/// Multipart field carrying the encode input.
pub const IMAGE_FIELD: &str = "image";
/// Multipart field carrying the decode input.
pub const PACKAGE_FIELD: &str = "encrypted_package";

/// Body of the service's `GET /` health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub status: String,
    pub message: String,
}

/// HTTP client for the secret-sharing service.
///
/// Holds one connection pool for the lifetime of the process. Every call is
/// a single request; callers decide whether to try again.
///
/// # Examples
///
/// ```no_run
/// use securevision_client::client::TransferClient;
/// use securevision_client::{Blob, MediaType};
///
/// # async fn run() -> securevision_client::Result<()> {
/// let client = TransferClient::new("http://localhost:8000");
/// let image = Blob::new("cat.png", MediaType::Png, std::fs::read("cat.png")?);
/// let archive = client.submit_encode(&image).await?;
/// println!("{} bytes", archive.bytes().len());
/// # Ok(())
/// # }
/// ```
pub struct TransferClient {
    http: reqwest::Client,
    base_url: String,
}

impl TransferClient {
    /// Create a client for the service at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Service root, e.g. `http://localhost:8000`. A trailing
    ///   slash is dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a client from the `[api]` section of the config file.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send an image to the encode endpoint and return the share archive.
    ///
    /// # Arguments
    ///
    /// * `image` - Image bytes, sent in the `image` field with its declared type
    ///
    /// # Returns
    ///
    /// The response body as `encrypted_shares.zip`. Its contents are not
    /// checked here; the presenter does that.
    ///
    /// # Errors
    ///
    /// `RemoteRejected` for any non-2xx status, `Transport` when the
    /// request never completes.
    pub async fn submit_encode(&self, image: &Blob) -> Result<BundleArchive> {
        info!(
            "📤 Sending {} ({} bytes) for encoding",
            image.name(),
            image.len()
        );

        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.name().to_string())
            .mime_str(image.media_type().mime())?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self.post(ENCRYPT_PATH, form).await?;
        let bytes = response.bytes().await?;

        info!("✅ Received share archive ({} bytes)", bytes.len());
        Ok(BundleArchive::new(
            super::presenter::ENCODE_DOWNLOAD_NAME,
            bytes.to_vec(),
        ))
    }

    /// Send an archive to the decode endpoint and return the reconstructed image.
    ///
    /// The part is always named `encrypted_package.zip`; the service refuses
    /// packages whose file name does not end in `.zip`.
    pub async fn submit_decode(&self, archive: &BundleArchive) -> Result<Blob> {
        info!(
            "📤 Sending package {} ({} bytes) for decoding",
            archive.name(),
            archive.bytes().len()
        );

        let part = Part::bytes(archive.bytes().to_vec())
            .file_name(PACKAGE_FILE_NAME)
            .mime_str(MediaType::Zip.mime())?;
        let form = Form::new().part(PACKAGE_FIELD, part);

        let response = self.post(DECRYPT_PATH, form).await?;
        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(MediaType::from_mime)
            .unwrap_or(MediaType::Png);
        let bytes = response.bytes().await?;

        info!("✅ Received reconstructed image ({} bytes)", bytes.len());
        Ok(Blob::new(
            super::presenter::DECODE_DOWNLOAD_NAME,
            media_type,
            bytes.to_vec(),
        ))
    }

    /// Check that the service is up.
    ///
    /// # Returns
    ///
    /// The `{ status, message }` body of `GET /`.
    pub async fn health(&self) -> Result<ApiStatus> {
        let url = format!("{}/", self.base_url);
        let response = self.http.get(&url).send().await?;
        let response = check_status("/", response)?;
        Ok(response.json::<ApiStatus>().await?)
    }

    async fn post(&self, path: &str, form: Form) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).multipart(form).send().await?;
        check_status(path, response)
    }
}

fn check_status(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        error!("❌ {} answered {}", endpoint, status);
        Err(ShareError::RemoteRejected {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = TransferClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
