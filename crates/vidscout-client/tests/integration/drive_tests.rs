use std::path::Path;

use serde_json::json;
use vidscout_core::error::AppError;
use vidscout_core::traits::Uploader;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::*;

fn write_export(dir: &Path) -> std::path::PathBuf {
    let file = dir.join("videos.csv");
    std::fs::write(&file, "Title,Channel,Views,Likes,Comments\nA,B,1,2,3\n").unwrap();
    file
}

#[tokio::test]
async fn upload_returns_remote_id() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_export(dir.path());

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .and(query_param("uploadType", "multipart"))
        .and(query_param("fields", "id"))
        .and(header("authorization", format!("Bearer {TEST_DRIVE_TOKEN}").as_str()))
        .and(body_string_contains("\"name\":\"videos.csv\""))
        .and(body_string_contains("A,B,1,2,3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-123"})))
        .expect(1)
        .mount(&server)
        .await;

    let id = drive_uploader(&server).upload(&file).await.unwrap();
    assert_eq!(id, "file-123");
}

#[tokio::test]
async fn rejected_token_is_auth_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_export(dir.path());

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": 401, "message": "Invalid Credentials", "errors": [{"reason": "authError"}]}
        })))
        .mount(&server)
        .await;

    let err = drive_uploader(&server).upload(&file).await.unwrap_err();
    match err {
        AppError::AuthError(msg) => assert!(msg.contains("Invalid Credentials")),
        other => panic!("expected AuthError, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_file_never_reaches_the_network() {
    let dir = tempfile::tempdir().unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "never"})))
        .expect(0)
        .mount(&server)
        .await;

    let missing = dir.path().join("missing.csv");
    let err = drive_uploader(&server).upload(&missing).await.unwrap_err();

    match err {
        AppError::FileNotFound(p) => assert_eq!(p, missing),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}
