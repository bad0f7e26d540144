mod common;

use common::{RecordingUpload, closed_port_url};
use portal::types::NoticeKind;
use portal::upload::{
    FilePick, HttpUploadBackend, SUCCESS_MESSAGE, SelectedFile, UNREACHABLE_MESSAGE,
    UPLOAD_LABEL, UploadBackend, UploadController, UploadError, UploadOutcome, UploadPolicy,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CSV: &[u8] = b"id,curso,nota\n1,Engenharia,9.5\n2,Direito,8.0\n";

fn sample() -> SelectedFile {
    SelectedFile::new("notas.csv", CSV.to_vec())
}

async fn select_sample(
    uploads: &mut UploadController<HttpUploadBackend>,
    page: &mut RecordingUpload,
) -> bool {
    let pick = FilePick::new("notas.csv", CSV.len() as u64);
    uploads
        .select_file(page, Some(pick), || async { Some(CSV.to_vec()) })
        .await
}

fn uploader(url: String) -> UploadController<HttpUploadBackend> {
    UploadController::new(HttpUploadBackend::new(url), UploadPolicy::default())
}

#[tokio::test]
async fn sends_file_as_multipart_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"csvFile\""))
        .and(body_string_contains("filename=\"notas.csv\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Arquivo processado e salvo com sucesso",
            "rows_processed": 2,
            "file_name": "notas.csv"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpUploadBackend::new(format!("{}/api/upload", server.uri()));
    let receipt = backend.upload(&sample()).await.expect("upload succeeds");

    assert_eq!(receipt.rows_processed, Some(2));
    assert_eq!(receipt.file_name.as_deref(), Some("notas.csv"));
}

#[tokio::test]
async fn successful_submit_clears_selection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let mut uploads = uploader(format!("{}/api/upload", server.uri()));
    let mut page = RecordingUpload::default();
    assert!(select_sample(&mut uploads, &mut page).await);
    assert_eq!(
        page.file_info,
        Some(("notas.csv".to_string(), format!("{} Bytes", CSV.len())))
    );

    let outcome = uploads.submit(&mut page).await;

    assert!(matches!(outcome, UploadOutcome::Uploaded(_)));
    assert!(uploads.selected().is_none());
    assert_eq!(
        page.message,
        Some((SUCCESS_MESSAGE.to_string(), NoticeKind::Success))
    );
    assert!(page.file_info.is_none());
    assert!(!page.upload_enabled);
    assert_eq!(page.label, UPLOAD_LABEL);
}

#[tokio::test]
async fn rejected_upload_reports_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "detail": "CSV vazio ou sem cabeçalho" })),
        )
        .mount(&server)
        .await;

    let mut uploads = uploader(format!("{}/api/upload", server.uri()));
    let mut page = RecordingUpload::default();
    select_sample(&mut uploads, &mut page).await;

    let outcome = uploads.submit(&mut page).await;

    assert_eq!(outcome, UploadOutcome::Failed);
    assert_eq!(
        page.message,
        Some((
            "Error uploading file: HTTP error 400: CSV vazio ou sem cabeçalho".to_string(),
            NoticeKind::Error
        ))
    );
    assert!(uploads.selected().is_some());
    assert!(page.upload_enabled);
    assert_eq!(page.label, UPLOAD_LABEL);
}

#[tokio::test]
async fn non_json_success_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let backend = HttpUploadBackend::new(format!("{}/api/upload", server.uri()));
    let err = backend.upload(&sample()).await.unwrap_err();

    assert!(matches!(err, UploadError::Response(_)));
}

#[tokio::test]
async fn unreachable_backend_gets_specific_message() {
    let mut uploads = uploader(format!("{}/api/upload", closed_port_url()));
    let mut page = RecordingUpload::default();
    select_sample(&mut uploads, &mut page).await;

    let outcome = uploads.submit(&mut page).await;

    assert_eq!(outcome, UploadOutcome::Failed);
    assert_eq!(
        page.message,
        Some((UNREACHABLE_MESSAGE.to_string(), NoticeKind::Error))
    );
    assert!(page.upload_enabled);
}
