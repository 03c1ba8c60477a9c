use async_trait::async_trait;
use echomind_core::documents::Document;
use echomind_core::upload::{
    HttpTransfer, ProgressReporter, StorageTransfer, TransferError, UploadCoordinator,
    UploadError, UploadFile, UploadOptions,
};
use echomind_core::ApiClient;
use mockito::{Matcher, Server, ServerGuard};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

/// Stands in for the storage host: records the URL it was handed, optionally
/// reports one progress step, then returns a canned result.
struct ScriptedTransfer {
    outcome: Result<(), TransferError>,
    report: Option<(u64, u64)>,
    urls: Mutex<Vec<String>>,
}

impl ScriptedTransfer {
    fn new(outcome: Result<(), TransferError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            report: None,
            urls: Mutex::new(Vec::new()),
        })
    }

    fn reporting(loaded: u64, total: u64) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(()),
            report: Some((loaded, total)),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

#[async_trait]
impl StorageTransfer for ScriptedTransfer {
    async fn put(
        &self,
        upload_url: &str,
        _file: &UploadFile,
        progress: &ProgressReporter,
    ) -> Result<(), TransferError> {
        self.urls.lock().push(upload_url.to_string());
        if let Some((loaded, total)) = self.report {
            progress.report(loaded, total);
        }
        self.outcome.clone()
    }
}

fn pdf(size: usize) -> UploadFile {
    UploadFile::new("t.pdf", "application/pdf", vec![1u8; size])
}

fn client(server: &ServerGuard) -> ApiClient {
    ApiClient::new(server.url(), Some("tok".into())).expect("client")
}

fn recorder() -> (UploadOptions, Arc<Mutex<Vec<u8>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let options = UploadOptions::default().on_progress(move |percent| sink.lock().push(percent));
    (options, seen)
}

async fn mock_initiate(
    server: &mut ServerGuard,
    upload_id: &str,
    upload_url: &str,
) -> mockito::Mock {
    server
        .mock("POST", "/upload/initiate")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::Json(json!({
            "file_name": "t.pdf",
            "file_type": "application/pdf",
            "file_size": 100
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "upload_id": upload_id,
                "upload_url": upload_url,
                "expires_at": "2024-01-01T01:00:00Z"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn successful_upload_reports_progress_and_returns_document() {
    let mut server = Server::new_async().await;
    let initiate = mock_initiate(&mut server, "u1", "https://x").await;
    let complete = server
        .mock("POST", "/upload/complete")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::Json(json!({"upload_id": "u1"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":1,"title":"t.pdf"}"#)
        .expect(1)
        .create_async()
        .await;

    let transfer = ScriptedTransfer::reporting(50, 100);
    let coordinator = UploadCoordinator::with_transfer(client(&server), transfer.clone());
    let (options, seen) = recorder();

    let document = coordinator
        .upload_document(&pdf(100), options)
        .await
        .expect("upload");

    assert_eq!(
        document,
        Document {
            id: 1,
            title: "t.pdf".into(),
            ..Document::default()
        }
    );
    assert_eq!(*seen.lock(), vec![50, 100]);
    assert_eq!(transfer.calls(), vec!["https://x".to_string()]);
    initiate.assert_async().await;
    complete.assert_async().await;
}

#[tokio::test]
async fn upload_id_from_initiate_is_sent_to_complete_with_title() {
    let mut server = Server::new_async().await;
    let _initiate = mock_initiate(&mut server, "u-777", "https://storage/u-777").await;
    let complete = server
        .mock("POST", "/upload/complete")
        .match_body(Matcher::Json(json!({"upload_id": "u-777", "title": "Quarterly"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":9,"title":"Quarterly"}"#)
        .expect(1)
        .create_async()
        .await;

    let coordinator =
        UploadCoordinator::with_transfer(client(&server), ScriptedTransfer::new(Ok(())));
    let document = coordinator
        .upload_document(&pdf(100), UploadOptions::default().title("Quarterly"))
        .await
        .expect("upload");

    assert_eq!(document.id, 9);
    complete.assert_async().await;
}

#[tokio::test]
async fn rejected_transfer_never_completes() {
    let mut server = Server::new_async().await;
    let _initiate = mock_initiate(&mut server, "u1", "https://x").await;
    let complete = server
        .mock("POST", "/upload/complete")
        .expect(0)
        .create_async()
        .await;

    let coordinator = UploadCoordinator::with_transfer(
        client(&server),
        ScriptedTransfer::new(Err(TransferError::Rejected { status: 403 })),
    );
    let (options, seen) = recorder();
    let err = coordinator
        .upload_document(&pdf(100), options)
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::TransferRejected { status: 403 }));
    assert!(err.to_string().contains("403"));
    assert_eq!(err.status(), Some(403));
    assert!(seen.lock().is_empty(), "no completion percentage on failure");
    complete.assert_async().await;
}

#[tokio::test]
async fn unreachable_storage_is_a_generic_failure() {
    let mut server = Server::new_async().await;
    let _initiate = mock_initiate(&mut server, "u1", "https://x").await;
    let complete = server
        .mock("POST", "/upload/complete")
        .expect(0)
        .create_async()
        .await;

    let coordinator = UploadCoordinator::with_transfer(
        client(&server),
        ScriptedTransfer::new(Err(TransferError::Unreachable {
            reason: "connection reset".into(),
        })),
    );
    let err = coordinator
        .upload_document(&pdf(100), UploadOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Upload failed");
    assert_eq!(err.status(), None);
    complete.assert_async().await;
}

#[tokio::test]
async fn initiation_rejection_surfaces_backend_detail() {
    let mut server = Server::new_async().await;
    let _initiate = server
        .mock("POST", "/upload/initiate")
        .with_status(413)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"File too large"}"#)
        .create_async()
        .await;
    let complete = server
        .mock("POST", "/upload/complete")
        .expect(0)
        .create_async()
        .await;

    let transfer = ScriptedTransfer::new(Ok(()));
    let coordinator = UploadCoordinator::with_transfer(client(&server), transfer.clone());
    let err = coordinator
        .upload_document(&pdf(100), UploadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::InitiationRejected(_)));
    assert_eq!(err.to_string(), "File too large");
    assert!(transfer.calls().is_empty());
    complete.assert_async().await;
}

#[tokio::test]
async fn completion_rejection_surfaces_backend_detail() {
    let mut server = Server::new_async().await;
    let _initiate = mock_initiate(&mut server, "u1", "https://x").await;
    let _complete = server
        .mock("POST", "/upload/complete")
        .with_status(410)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"Upload session expired"}"#)
        .create_async()
        .await;

    let coordinator =
        UploadCoordinator::with_transfer(client(&server), ScriptedTransfer::new(Ok(())));
    let err = coordinator
        .upload_document(&pdf(100), UploadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::CompletionRejected(_)));
    assert_eq!(err.to_string(), "Upload session expired");
    assert_eq!(err.status(), Some(410));
}

#[tokio::test]
async fn full_chain_over_http_keeps_token_off_storage() {
    let mut server = Server::new_async().await;
    let storage_url = format!("{}/storage/u1", server.url());
    let _initiate = mock_initiate(&mut server, "u1", &storage_url).await;
    let storage = server
        .mock("PUT", "/storage/u1")
        .match_header("content-type", "application/pdf")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let _complete = server
        .mock("POST", "/upload/complete")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":1,"title":"t.pdf","status":"DOCUMENT_STATUS_PENDING"}"#)
        .create_async()
        .await;

    let (options, seen) = recorder();
    let coordinator = UploadCoordinator::with_transfer(
        client(&server),
        Arc::new(HttpTransfer::default()),
    );
    let document = coordinator
        .upload_document(&pdf(100), options)
        .await
        .expect("upload");

    assert_eq!(document.title, "t.pdf");
    assert_eq!(seen.lock().last(), Some(&100));
    storage.assert_async().await;
}

#[tokio::test]
async fn storage_rejection_over_http_never_shows_completion() {
    let mut server = Server::new_async().await;
    let storage_url = format!("{}/storage/u1", server.url());
    let _initiate = mock_initiate(&mut server, "u1", &storage_url).await;
    let _storage = server
        .mock("PUT", "/storage/u1")
        .with_status(403)
        .create_async()
        .await;
    let complete = server
        .mock("POST", "/upload/complete")
        .expect(0)
        .create_async()
        .await;

    let (options, seen) = recorder();
    let coordinator = UploadCoordinator::with_transfer(
        client(&server),
        Arc::new(HttpTransfer::default()),
    );
    let err = coordinator
        .upload_document(&pdf(100), options)
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::TransferRejected { status: 403 }));
    assert!(!seen.lock().contains(&100));
    complete.assert_async().await;
}

#[tokio::test]
async fn abort_posts_the_upload_id() {
    let mut server = Server::new_async().await;
    let abort = server
        .mock("POST", "/upload/abort")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::Json(json!({"upload_id": "u1"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Upload aborted","upload_id":"u1"}"#)
        .create_async()
        .await;

    let response = UploadCoordinator::new(client(&server))
        .abort("u1")
        .await
        .expect("abort");

    assert_eq!(response.upload_id, "u1");
    abort.assert_async().await;
}

#[tokio::test]
async fn file_from_disk_is_uploaded_with_inferred_type() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("notes.md");
    tokio::fs::write(&path, b"# Notes").await.expect("write");

    let mut server = Server::new_async().await;
    let initiate = server
        .mock("POST", "/upload/initiate")
        .match_body(Matcher::Json(json!({
            "file_name": "notes.md",
            "file_type": "text/markdown",
            "file_size": 7,
            "connector_id": 4
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"upload_id":"u2","upload_url":"https://x","expires_at":"2024-01-01T01:00:00Z"}"#)
        .create_async()
        .await;
    let _complete = server
        .mock("POST", "/upload/complete")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":2}"#)
        .create_async()
        .await;

    let file = UploadFile::from_path(&path).await.expect("file");
    let coordinator =
        UploadCoordinator::with_transfer(client(&server), ScriptedTransfer::new(Ok(())));
    coordinator
        .upload_document(&file, UploadOptions::default().connector(4))
        .await
        .expect("upload");

    initiate.assert_async().await;
}
