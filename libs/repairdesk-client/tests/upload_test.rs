use httpmock::prelude::*;
use repairdesk_client::{ApiClient, ClientError, PendingFile, UploadBatch};
use serde_json::json;

fn jpeg(name: &str) -> PendingFile {
    PendingFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}

#[tokio::test]
async fn uploads_pending_files_once() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/upload")
                .header("authorization", "Bearer tok")
                .header_exists("content-type");
            then.status(200).json_body(json!({
                "file_url": "/uploads/a1.jpg",
                "filename": "a1.jpg",
            }));
        })
        .await;

    let mut api = ApiClient::new(&server.base_url()).unwrap();
    api.set_token(Some("tok".into()));

    let mut batch = UploadBatch::default();
    batch.add_files(vec![jpeg("front.jpg")]).unwrap();
    let done = batch.upload_all(&api).await.unwrap();
    first.assert_async().await;
    assert_eq!(done.len(), 1);
    assert_eq!(batch.files()[0].uploaded().unwrap().filename, "a1.jpg");

    first.delete_async().await;
    let second = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/upload");
            then.status(200).json_body(json!({
                "file_url": "/uploads/b2.jpg",
                "filename": "b2.jpg",
            }));
        })
        .await;

    batch.add_files(vec![jpeg("back.jpg")]).unwrap();
    let done = batch.upload_all(&api).await.unwrap();
    second.assert_async().await;
    assert_eq!(done.len(), 2);
    assert_eq!(
        batch.file_urls(),
        vec!["/uploads/a1.jpg".to_string(), "/uploads/b2.jpg".to_string()]
    );
}

#[tokio::test]
async fn server_rejection_is_reported_and_file_stays_pending() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/upload");
            then.status(400).json_body(json!({
                "type": "about:blank",
                "title": "Validation error",
                "status": 400,
                "detail": "file type 'text/plain' is not allowed",
                "instance": "/api/upload",
                "code": "VALIDATION",
            }));
        })
        .await;

    let api = ApiClient::new(&server.base_url()).unwrap();
    let mut batch = UploadBatch::default();
    batch.add_files(vec![jpeg("scan.jpg")]).unwrap();

    let err = batch.upload_all(&api).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "file type 'text/plain' is not allowed");
    assert!(batch.files()[0].uploaded().is_none());
    assert!(batch.file_urls().is_empty());
}

#[tokio::test]
async fn empty_batch_is_rejected_locally() {
    let api = ApiClient::new("http://127.0.0.1:9").unwrap();
    let mut batch = UploadBatch::default();
    let err = batch.upload_all(&api).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[test]
fn files_read_from_disk_get_a_content_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Receipt.PDF");
    std::fs::write(&path, b"%PDF-1.4").unwrap();

    let f = PendingFile::from_path(&path).unwrap();
    assert_eq!(f.name, "Receipt.PDF");
    assert_eq!(f.content_type, "application/pdf");
    assert_eq!(f.size(), 8);
}
