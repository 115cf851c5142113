//! HTTP-level tests for `ApiClient` against a mock server.

use pdf2md_client::{
    upload_pdf, ApiClient, ClientConfig, ClientError, FileApi, FileStatus, PdfUpload,
    UploadSession, UploadState,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn client_for(server: &MockServer) -> (ApiClient, ClientConfig) {
    let config = ClientConfig::builder()
        .base_url(server.uri())
        .timeout_secs(5)
        .build()
        .unwrap();
    (ApiClient::new(config.clone()).unwrap(), config)
}

fn sample_pdf() -> PdfUpload {
    PdfUpload::new("report.pdf", b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n%%EOF\n".to_vec())
}

fn file_row(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "filename": format!("{id}.pdf"),
        "status": status,
        "created_at": "2025-06-01T10:05:09.123456",
        "file_size": 2048,
        "processing_time": 3.5
    })
}

// ── Endpoints ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_service_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "version": "1.0.0",
            "timestamp": "2025-06-01T10:00:00",
            "uptime": 12.5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _) = client_for(&server);
    let h = tokio_test::assert_ok!(api.health().await);
    assert_eq!(h.status, "healthy");
    assert_eq!(h.version, "1.0.0");
    assert_eq!(h.uptime, Some(12.5));
}

#[tokio::test]
async fn list_sends_page_and_per_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("page", "3"))
        .and(query_param("per_page", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [file_row("a", "completed"), file_row("b", "processing")],
            "total_count": 16,
            "page": 3,
            "per_page": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _) = client_for(&server);
    let resp = api.list_files(3, 7).await.unwrap();
    assert_eq!(resp.total_count, 16);
    assert_eq!(resp.page, 3);
    assert_eq!(resp.files.len(), 2);
    assert_eq!(resp.files[0].status, FileStatus::Completed);
    assert_eq!(resp.files[1].status, FileStatus::Processing);
    assert_eq!(resp.files[0].processing_time, Some(3.5));
}

#[tokio::test]
async fn unknown_status_string_decodes_as_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [file_row("a", "queued")],
            "total_count": 1
        })))
        .mount(&server)
        .await;

    let (api, _) = client_for(&server);
    let resp = api.list_files(1, 10).await.unwrap();
    assert_eq!(resp.files[0].status, FileStatus::Unknown);
    assert_eq!(resp.page, 1);
}

#[tokio::test]
async fn get_file_returns_markdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "filename": "abc.pdf",
            "markdown": "# Title\n",
            "created_at": "2025-06-01T10:05:09"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _) = client_for(&server);
    let f = api.get_file("abc").await.unwrap();
    assert_eq!(f.markdown, "# Title\n");
    assert!(f.updated_at.is_none());
}

#[tokio::test]
async fn file_id_is_sent_as_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/files/a%2Fb%3Fc%23d"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/files/a/b"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (api, _) = client_for(&server);
    tokio_test::assert_ok!(api.delete_file("a/b?c#d").await);
}

#[tokio::test]
async fn missing_file_surfaces_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "ファイルが見つかりません" })),
        )
        .mount(&server)
        .await;

    let (api, _) = client_for(&server);
    let err = api.get_file("gone").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.detail(), Some("ファイルが見つかりません"));
    assert_eq!(err.user_message("fallback"), "ファイルが見つかりません");
}

#[tokio::test]
async fn error_without_detail_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/files/x"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let (api, _) = client_for(&server);
    let err = api.delete_file("x").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, detail: None }));
    assert_eq!(err.user_message("ファイルの削除に失敗しました"), "ファイルの削除に失敗しました");
}

#[tokio::test]
async fn delete_returns_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/files/abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (api, _) = client_for(&server);
    assert_eq!(api.delete_file("abc").await.unwrap().message, "deleted");
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let (api, _) = client_for(&server);
    let err = api.list_files(1, 10).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "healthy", "version": "1" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(server.uri())
        .timeout_secs(1)
        .build()
        .unwrap();
    let api = ApiClient::new(config).unwrap();
    let err = api.health().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout { secs: 1, .. }), "got {err:?}");
}

// ── Multipart uploads ────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_posts_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"report.pdf\""))
        .and(body_string_contains("application/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "new-id",
            "filename": "report.pdf",
            "markdown": "# Report\n",
            "created_at": "2025-06-01T10:05:09",
            "message": "ok",
            "status": "completed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, config) = client_for(&server);
    let resp = upload_pdf(&api, &config, sample_pdf()).await.unwrap();
    assert_eq!(resp.id, "new-id");
    assert_eq!(resp.status, Some(FileStatus::Completed));
}

#[tokio::test]
async fn update_puts_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/files/abc"))
        .and(body_string_contains("name=\"file\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "filename": "report.pdf",
            "markdown": "# v2\n",
            "created_at": "2025-06-01T10:05:09",
            "updated_at": "2025-06-02T08:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _) = client_for(&server);
    let f = api.update_file("abc", sample_pdf()).await.unwrap();
    assert_eq!(f.markdown, "# v2\n");
    assert_eq!(f.updated_at.as_deref(), Some("2025-06-02T08:00:00"));
}

#[tokio::test]
async fn non_pdf_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (api, config) = client_for(&server);
    let txt = PdfUpload::new("notes.txt", b"hello".to_vec());
    let err = tokio_test::assert_err!(upload_pdf(&api, &config, txt).await);
    assert!(err.is_validation());
    assert_eq!(err.user_message(""), "PDFファイルのみアップロード可能です。");
}

#[tokio::test]
async fn oversize_pdf_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(server.uri())
        .max_upload_bytes(16)
        .build()
        .unwrap();
    let api = ApiClient::new(config.clone()).unwrap();

    let mut session = UploadSession::new();
    let err = session.upload(&api, &config, sample_pdf()).await.unwrap_err();
    assert!(matches!(err, ClientError::FileTooLarge { limit: 16, .. }));
    assert_eq!(session.state(), &UploadState::Idle);
}

#[tokio::test]
async fn upload_session_records_server_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "detail": "変換に失敗しました" })),
        )
        .mount(&server)
        .await;

    let (api, config) = client_for(&server);
    let mut session = UploadSession::new();
    session.upload(&api, &config, sample_pdf()).await.unwrap();
    assert_eq!(session.state().error(), Some("変換に失敗しました"));
    assert!(session.accepts_input());

    session.reset();
    assert_eq!(session.state(), &UploadState::Idle);
}
