use parley_server::RelayConfig;
use reqwest::multipart::Form;

use crate::integration::init_tracing;
use crate::utils::{get, post_capture, post_form, post_upload_body, spawn_test_server};

#[tokio::test]
async fn test_upload_stores_capture_and_serves_it_back() {
    init_tracing();

    let server = spawn_test_server(RelayConfig::default())
        .await
        .expect("server should start");

    let (status, body) = post_capture(server.addr, "meeting.webm", b"fake-webm-data")
        .await
        .expect("upload request");
    assert_eq!(status, 200, "body: {}", body);

    let response: serde_json::Value = serde_json::from_str(&body).expect("json body");
    let url = response["url"].as_str().expect("url field");
    let prefix = format!("http://{}/captures/", server.addr);
    assert!(url.starts_with(&prefix), "unexpected url {}", url);

    let name = &url[prefix.len()..];
    assert!(name.ends_with("-meeting.webm"));
    let stored = std::fs::read(server.uploads.path().join(name)).expect("stored file");
    assert_eq!(stored, b"fake-webm-data");

    let (status, served) = get(server.addr, &format!("/captures/{}", name))
        .await
        .expect("download request");
    assert_eq!(status, 200);
    assert_eq!(served, "fake-webm-data");
}

#[tokio::test]
async fn test_upload_without_file_is_bad_request() {
    init_tracing();

    let server = spawn_test_server(RelayConfig::default())
        .await
        .expect("server should start");

    let (status, body) = post_capture(server.addr, "empty.webm", b"")
        .await
        .expect("upload request");

    assert_eq!(status, 400);
    assert!(body.contains("No file uploaded"));
}

#[tokio::test]
async fn test_upload_form_without_file_field_is_bad_request() {
    init_tracing();

    let server = spawn_test_server(RelayConfig::default())
        .await
        .expect("server should start");

    let form = Form::new().text("title", "meeting");
    let (status, body) = post_form(server.addr, form)
        .await
        .expect("upload request");

    assert_eq!(status, 400);
    assert!(body.contains("No file uploaded"));
    assert_eq!(
        std::fs::read_dir(server.uploads.path())
            .expect("uploads dir")
            .count(),
        0
    );
}

#[tokio::test]
async fn test_truncated_multipart_body_is_bad_request() {
    init_tracing();

    let server = spawn_test_server(RelayConfig::default())
        .await
        .expect("server should start");

    let (status, body) = post_upload_body(
        server.addr,
        "multipart/form-data; boundary=parley",
        b"--parley\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cut.webm\"\r\n\r\npartial",
    )
    .await
    .expect("upload request");

    assert_eq!(status, 400);
    assert!(body.contains("No file uploaded"));
}

#[tokio::test]
async fn test_health_probe() {
    init_tracing();

    let server = spawn_test_server(RelayConfig::default())
        .await
        .expect("server should start");

    let (status, body) = get(server.addr, "/health").await.expect("health request");
    assert_eq!(status, 200);
    assert_eq!(body, "ok");
}
