//! Full session against an in-process HTTP backend

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use redact_core::{ArtifactKind, Document, DocumentRef, PDF_CONTENT_TYPE, SensitiveType};
use redact_gateway::HttpGateway;
use redact_workflow::{Stage, Workflow, WorkflowEvent, WorkflowOptions};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct MockBackend {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    detect_gets: Arc<Mutex<usize>>,
    redact_bodies: Arc<Mutex<Vec<Value>>>,
}

async fn upload(State(state): State<MockBackend>, mut multipart: Multipart) -> Json<Value> {
    let field = multipart.next_field().await.unwrap().unwrap();
    let name = field.file_name().unwrap_or_default().to_string();
    let bytes = field.bytes().await.unwrap().to_vec();

    let id = uuid::Uuid::new_v4().simple().to_string();
    state.files.lock().unwrap().insert(id.clone(), bytes);
    Json(json!({"success": true, "file_id": id, "filename": name}))
}

// Deployed backend only accepts GET here
async fn detect(State(state): State<MockBackend>, Path(id): Path<String>) -> Json<Value> {
    *state.detect_gets.lock().unwrap() += 1;
    assert!(state.files.lock().unwrap().contains_key(&id));
    Json(json!({
        "success": true,
        "file_id": id,
        "detected_data": {
            "Aadhaar": ["1234 5678 9012"],
            "Email": ["a@b.com"]
        }
    }))
}

async fn redact(
    State(state): State<MockBackend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let count: usize = body["items_to_redact"]
        .as_object()
        .map(|items| items.values().filter_map(Value::as_array).map(Vec::len).sum())
        .unwrap_or(0);
    state.redact_bodies.lock().unwrap().push(body);
    Json(json!({
        "success": true,
        "download_url": format!("/download/{}", id),
        "verification_url": format!("/download/{}/report", id),
        "redacted_count": count
    }))
}

async fn info(Path(id): Path<String>) -> Json<Value> {
    Json(json!({
        "file_id": id,
        "pdf_available": true,
        "report_available": true,
        "pdf_size": 13,
        "pdf_size_mb": 0.0,
        "report_size": 2,
        "report_size_kb": 0.0
    }))
}

async fn pdf_file() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, PDF_CONTENT_TYPE)], b"%PDF-redacted".to_vec())
}

async fn report() -> Json<Value> {
    Json(json!({"total_redacted": 1}))
}

async fn spawn_backend(state: MockBackend) -> String {
    let router = Router::new()
        .route("/upload/", post(upload))
        .route("/data/:id", get(detect))
        .route("/redact/:id", post(redact))
        .route("/download/:id/info", get(info))
        .route("/download/:id", get(pdf_file))
        .route("/download/:id/report", get(report))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_session_over_http_with_detect_fallback() {
    let state = MockBackend::default();
    let base = spawn_backend(state.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let gateway = HttpGateway::new(&base, Duration::from_secs(5)).unwrap();
    let mut wf = Workflow::new(
        Arc::new(gateway),
        WorkflowOptions {
            download_dir: dir.path().join("out"),
            ..WorkflowOptions::default()
        },
    );

    let document = Document::new("scan.pdf", PDF_CONTENT_TYPE, b"%PDF-1.4 body".to_vec());
    wf.submit_upload(document).unwrap();
    let events = wf.settle().await;

    // the 405 on POST is absorbed by the gateway
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], WorkflowEvent::Uploaded(_)));
    assert_eq!(events[1], WorkflowEvent::Detected { types: 2, items: 2 });
    assert_eq!(*state.detect_gets.lock().unwrap(), 1);
    assert_eq!(wf.stage(), &Stage::PreviewReady);

    wf.deselect_all(&SensitiveType::Email).unwrap();
    wf.submit_redact().unwrap();
    wf.settle().await;

    assert_eq!(wf.stage(), &Stage::ResultReady);
    assert_eq!(
        state.redact_bodies.lock().unwrap()[0],
        json!({"items_to_redact": {"Aadhaar": ["1234 5678 9012"]}})
    );
    let snapshot = wf.snapshot();
    assert_eq!(snapshot.result.as_ref().unwrap().redacted_count, 1);
    let downloads = snapshot.downloads.unwrap();
    assert!(downloads.pdf_available && downloads.report_available);
    assert_eq!(downloads.pdf_size_text(), "Size unknown");

    wf.request_download(ArtifactKind::Pdf).unwrap();
    wf.request_download(ArtifactKind::Report).unwrap();
    wf.settle().await;

    let doc: DocumentRef = wf.snapshot().document_ref.unwrap();
    let pdf_path = dir.path().join("out").join(format!("redacted_document_{}.pdf", doc));
    let report_path = dir
        .path()
        .join("out")
        .join(format!("verification_report_{}.json", doc));
    assert_eq!(std::fs::read(pdf_path).unwrap(), b"%PDF-redacted");
    let report: Value = serde_json::from_slice(&std::fs::read(report_path).unwrap()).unwrap();
    assert_eq!(report["total_redacted"], 1);
    assert_eq!(wf.snapshot().saved.len(), 2);
}
