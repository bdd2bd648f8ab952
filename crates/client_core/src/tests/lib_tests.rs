use super::*;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

const DOCX_BYTES: &[u8] = b"PK\x03\x04converted-docx-bytes";

#[derive(Debug)]
struct CapturedUpload {
    field_name: String,
    file_name: String,
    content_type: String,
    size_bytes: usize,
}

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<CapturedUpload>>>>,
    status: StatusCode,
    body: Value,
}

async fn handle_upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut captured = None;
    while let Some(field) = multipart.next_field().await.expect("read multipart field") {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.expect("read field bytes");
        captured = Some(CapturedUpload {
            field_name,
            file_name,
            content_type,
            size_bytes: bytes.len(),
        });
    }

    if let (Some(captured), Some(tx)) = (captured, state.tx.lock().await.take()) {
        let _ = tx.send(captured);
    }

    (state.status, Json(state.body.clone()))
}

async fn handle_download() -> &'static [u8] {
    DOCX_BYTES
}

async fn spawn_convert_server(
    status: StatusCode,
    body: Value,
) -> Result<(String, oneshot::Receiver<CapturedUpload>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
        status,
        body,
    };
    let app = Router::new()
        .route("/upload", post(handle_upload))
        .route("/download/:filename", get(handle_download))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), rx))
}

async fn spawn_artifact_only_server() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().route("/download/:filename", get(handle_download));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn pdf_upload() -> DocumentUpload {
    DocumentUpload {
        filename: "report.pdf".to_string(),
        media_type: Some("application/pdf".to_string()),
        bytes: b"%PDF-1.4 test document".to_vec(),
    }
}

#[tokio::test]
async fn convert_posts_a_single_file_multipart_field() {
    let (server_url, captured_rx) = spawn_convert_server(
        StatusCode::OK,
        json!({"message": "Conversion successful", "download_url": "/download/report.docx"}),
    )
    .await
    .expect("spawn server");

    let upload = pdf_upload();
    let upload_len = upload.bytes.len();
    ConversionClient::new(server_url)
        .convert(upload)
        .await
        .expect("convert");

    let captured = captured_rx.await.expect("captured upload");
    assert_eq!(captured.field_name, "file");
    assert_eq!(captured.file_name, "report.pdf");
    assert_eq!(captured.content_type, "application/pdf");
    assert_eq!(captured.size_bytes, upload_len);
}

#[tokio::test]
async fn convert_fetches_artifact_and_swaps_extension() {
    let (server_url, _captured_rx) = spawn_convert_server(
        StatusCode::OK,
        json!({"message": "Conversion successful", "download_url": "/download/report.docx"}),
    )
    .await
    .expect("spawn server");

    let artifact = ConversionClient::new(server_url.clone())
        .convert(pdf_upload())
        .await
        .expect("convert");

    assert_eq!(artifact.bytes, DOCX_BYTES);
    assert_eq!(artifact.output_filename, "report.docx");
    assert_eq!(
        artifact.download_url,
        format!("{server_url}/download/report.docx")
    );
}

#[tokio::test]
async fn convert_passes_server_error_message_through() {
    let (server_url, _captured_rx) = spawn_convert_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "corrupt PDF"}),
    )
    .await
    .expect("spawn server");

    let err = ConversionClient::new(server_url)
        .convert(pdf_upload())
        .await
        .expect_err("conversion should be refused");

    match &err {
        ConvertError::Rejected { message } => assert_eq!(message, "corrupt PDF"),
        other => panic!("unexpected error variant: {other:?}"),
    }
    assert_eq!(err.user_message(), "corrupt PDF");
}

#[tokio::test]
async fn refusal_without_message_uses_the_fixed_fallback() {
    let (server_url, _captured_rx) =
        spawn_convert_server(StatusCode::BAD_REQUEST, json!({}))
            .await
            .expect("spawn server");

    let err = ConversionClient::new(server_url)
        .convert(pdf_upload())
        .await
        .expect_err("conversion should be refused");

    assert_eq!(err.user_message(), CONVERSION_FAILED_FALLBACK);
}

#[tokio::test]
async fn non_json_refusal_body_uses_the_fixed_fallback() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/upload",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let err = ConversionClient::new(format!("http://{addr}"))
        .convert(pdf_upload())
        .await
        .expect_err("conversion should be refused");

    assert_eq!(err.user_message(), CONVERSION_FAILED_FALLBACK);
}

#[tokio::test]
async fn success_body_without_download_url_is_a_failure() {
    let (server_url, _captured_rx) =
        spawn_convert_server(StatusCode::OK, json!({"message": "Conversion successful"}))
            .await
            .expect("spawn server");

    let err = ConversionClient::new(server_url)
        .convert(pdf_upload())
        .await
        .expect_err("missing download_url should fail");

    assert_eq!(err.user_message(), UNKNOWN_ERROR_FALLBACK);
}

#[tokio::test]
async fn success_body_with_error_field_passes_the_message_through() {
    let (server_url, _captured_rx) =
        spawn_convert_server(StatusCode::OK, json!({"error": "disk full"}))
            .await
            .expect("spawn server");

    let err = ConversionClient::new(server_url)
        .convert(pdf_upload())
        .await
        .expect_err("error body should fail");

    assert_eq!(err.user_message(), "disk full");
}

#[tokio::test]
async fn artifact_fetch_failure_is_reported_as_such() {
    let (server_url, _captured_rx) = spawn_convert_server(
        StatusCode::OK,
        json!({"download_url": "/missing/report.docx"}),
    )
    .await
    .expect("spawn server");

    let err = ConversionClient::new(server_url)
        .convert(pdf_upload())
        .await
        .expect_err("artifact fetch should fail");

    assert!(err.is_artifact_fetch(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn absolute_download_url_is_fetched_as_given() {
    let artifact_server_url = spawn_artifact_only_server().await.expect("artifact server");
    let (server_url, _captured_rx) = spawn_convert_server(
        StatusCode::OK,
        json!({"download_url": format!("{artifact_server_url}/download/report.docx")}),
    )
    .await
    .expect("spawn server");

    let artifact = ConversionClient::new(server_url)
        .convert(pdf_upload())
        .await
        .expect("convert");

    assert_eq!(artifact.bytes, DOCX_BYTES);
    assert_eq!(
        artifact.download_url,
        format!("{artifact_server_url}/download/report.docx")
    );
}

#[tokio::test]
async fn network_failure_surfaces_as_a_transport_error() {
    // Bind then drop to get a port with nothing listening on it.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = ConversionClient::new(format!("http://{addr}"))
        .convert(pdf_upload())
        .await
        .expect_err("request should fail");

    assert!(
        matches!(err, ConvertError::Transport { .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn trailing_slash_in_server_url_is_tolerated() {
    let (server_url, _captured_rx) = spawn_convert_server(
        StatusCode::OK,
        json!({"download_url": "/download/report.docx"}),
    )
    .await
    .expect("spawn server");

    let artifact = ConversionClient::new(format!("{server_url}/"))
        .convert(pdf_upload())
        .await
        .expect("convert");

    assert_eq!(artifact.output_filename, "report.docx");
}

#[tokio::test]
async fn missing_document_renderer_always_fails() {
    let err = MissingDocumentRenderer
        .render(DOCX_BYTES)
        .await
        .expect_err("missing renderer must fail");
    assert!(err.to_string().contains("unavailable"));
}
