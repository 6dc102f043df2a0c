use std::io::{Cursor, Write};
use std::time::Duration;

use axum::{
    http::{header, StatusCode},
    routing::post,
    Router,
};
use tokio::net::TcpListener;

use securevision_client::bundle::{self, Member};
use securevision_client::client::presenter::{DECODE_DOWNLOAD_NAME, ENCODE_DOWNLOAD_NAME};
use securevision_client::client::{ResultArtifact, TransferClient};
use securevision_client::stub::{self, PLACEHOLDER_RECOVERY};
use securevision_client::{Blob, BundleArchive, DecodeFlow, EncodeFlow, MediaType, ShareError};

/// Start the loopback service on an ephemeral port.
async fn spawn_stub() -> TransferClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        stub::serve(listener).await.ok();
    });
    TransferClient::new(format!("http://{}", addr))
}

/// Start a service that fails every call with `status`.
async fn spawn_failing(status: StatusCode) -> TransferClient {
    let app = Router::new()
        .route("/api/v1/encrypt", post(move || async move { status }))
        .route("/api/v1/decrypt", post(move || async move { status }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    TransferClient::new(format!("http://{}", addr))
}

/// Start a service that accepts connections and never answers.
async fn spawn_silent() -> TransferClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    TransferClient::new(format!("http://{}", addr))
}

fn photo() -> Blob {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([10, 20, 30]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    Blob::new("photo.png", MediaType::Png, bytes)
}

#[tokio::test]
async fn test_health_check() {
    let client = spawn_stub().await;
    let status = client.health().await.unwrap();
    assert_eq!(status.status, "healthy");
}

#[tokio::test]
async fn test_encode_presents_two_shares_and_archive() {
    let client = spawn_stub().await;
    let mut flow = EncodeFlow::new();

    flow.select_image(photo()).unwrap();
    assert!(flow.action_enabled());
    flow.submit(&client).await.unwrap();
    assert!(!flow.is_pending());

    let presenter = flow.presenter();
    let handles = presenter.handles();
    assert_eq!(handles.len(), 2);
    assert_ne!(handles[0], handles[1]);

    let artifact = presenter.artifact().unwrap();
    assert!(matches!(artifact, ResultArtifact::Shares(_)));
    assert_eq!(artifact.suggested_file_name(), ENCODE_DOWNLOAD_NAME);

    let dir = tempfile::tempdir().unwrap();
    let saved = presenter.save_to(dir.path()).unwrap();
    assert_eq!(saved, dir.path().join("encrypted_shares.zip"));

    let written = BundleArchive::new("x.zip", std::fs::read(&saved).unwrap());
    let bundle = bundle::decode_bundle(&written).unwrap();
    assert_eq!(bundle.share1.bytes(), photo().bytes());
    assert_eq!(bundle.recovery.bytes(), PLACEHOLDER_RECOVERY);

    let exported = presenter.export_previews(dir.path()).unwrap();
    assert_eq!(
        exported,
        vec![dir.path().join("share1.png"), dir.path().join("share2.png")]
    );
}

#[tokio::test]
async fn test_decode_from_uploaded_package() {
    let client = spawn_stub().await;

    let package = client.submit_encode(&photo()).await.unwrap();
    let upload = Blob::new("package.zip", MediaType::Zip, package.bytes().to_vec());

    let mut flow = DecodeFlow::new();
    flow.add_files(vec![upload]).unwrap();
    assert!(flow.action_enabled());
    flow.submit(&client).await.unwrap();

    let presenter = flow.presenter();
    assert_eq!(presenter.handles().len(), 1);
    match presenter.artifact().unwrap() {
        ResultArtifact::Image(image) => {
            assert_eq!(image.bytes(), photo().bytes());
            assert_eq!(image.media_type(), &MediaType::Png);
        }
        other => panic!("expected an image, got {:?}", other),
    }

    let dir = tempfile::tempdir().unwrap();
    let saved = presenter.save_to(dir.path()).unwrap();
    assert_eq!(saved.file_name().unwrap(), DECODE_DOWNLOAD_NAME);
}

#[tokio::test]
async fn test_decode_from_loose_files() {
    let client = spawn_stub().await;
    let mut flow = DecodeFlow::new();

    let share1 = Blob::new("share1.png", MediaType::Png, photo().bytes().to_vec());
    let share2 = Blob::new("share2.png", MediaType::Png, vec![1, 2, 3]);
    let recovery = Blob::new("recovery_data.npy", MediaType::OctetStream, vec![0x93]);

    flow.add_files(vec![share1]).unwrap();
    flow.add_files(vec![share2]).unwrap();
    assert!(!flow.action_enabled());
    flow.add_files(vec![recovery]).unwrap();
    assert!(flow.action_enabled());

    flow.submit(&client).await.unwrap();

    match flow.presenter().artifact().unwrap() {
        ResultArtifact::Image(image) => assert_eq!(image.bytes(), photo().bytes()),
        other => panic!("expected an image, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stub_rejects_incomplete_package() {
    let client = spawn_stub().await;

    let only_shares = {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for name in [Member::Share1.file_name(), Member::Share2.file_name()] {
            writer
                .start_file(name, zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(&[1, 2, 3]).unwrap();
        }
        BundleArchive::new("partial.zip", writer.finish().unwrap().into_inner())
    };

    match client.submit_decode(&only_shares).await {
        Err(ShareError::RemoteRejected { endpoint, status }) => {
            assert_eq!(endpoint, "/api/v1/decrypt");
            assert_eq!(status, 400);
        }
        other => panic!("expected RemoteRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_remote_failure_is_surfaced_and_action_reenabled() {
    let client = spawn_failing(StatusCode::INTERNAL_SERVER_ERROR).await;
    let mut flow = EncodeFlow::new();
    flow.select_image(photo()).unwrap();

    let err = flow.submit(&client).await.unwrap_err();
    assert!(matches!(
        err,
        ShareError::RemoteRejected { status: 500, .. }
    ));
    assert_eq!(err.user_message(), "Request failed, please try again");

    assert!(flow.action_enabled());
    assert!(flow.presenter().artifact().is_none());

    let archive = bundle::encode_bundle(Some(&photo()), Some(&photo()), Some(&photo())).unwrap();
    assert!(matches!(
        client.submit_decode(&archive).await,
        Err(ShareError::RemoteRejected { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_abandoned_submit_reenables_action() {
    let client = spawn_silent().await;

    let mut encode = EncodeFlow::new();
    encode.select_image(photo()).unwrap();
    let timed_out = tokio::time::timeout(Duration::from_millis(200), encode.submit(&client)).await;
    assert!(timed_out.is_err());
    assert!(!encode.is_pending());
    assert!(encode.action_enabled());

    let mut decode = DecodeFlow::new();
    decode
        .add_files(vec![
            Blob::new("share1.png", MediaType::Png, vec![1]),
            Blob::new("share2.png", MediaType::Png, vec![2]),
            Blob::new("recovery_data.npy", MediaType::OctetStream, vec![3]),
        ])
        .unwrap();
    let timed_out = tokio::time::timeout(Duration::from_millis(200), decode.submit(&client)).await;
    assert!(timed_out.is_err());
    assert!(!decode.is_pending());
    assert!(decode.action_enabled());
}

#[tokio::test]
async fn test_decode_result_type_ignores_content_type_parameters() {
    let app = Router::new().route(
        "/api/v1/decrypt",
        post(|| async {
            (
                [(header::CONTENT_TYPE, "image/png; charset=binary")],
                vec![1u8, 2, 3],
            )
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    let client = TransferClient::new(format!("http://{}", addr));

    let archive = bundle::encode_bundle(Some(&photo()), Some(&photo()), Some(&photo())).unwrap();
    let image = client.submit_decode(&archive).await.unwrap();

    assert_eq!(image.media_type(), &MediaType::Png);
    assert_eq!(image.bytes(), &[1, 2, 3]);
}
