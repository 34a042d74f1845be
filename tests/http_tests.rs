// Integration tests for the HTTP surfaces
//
// - the dashboard router, driven in-process with tower's `oneshot`
// - the analysis client, against a fake backend bound to an ephemeral port

mod common;

use anyhow::Result;
use affect_orchestrator::analysis::{AnalysisBackend, EvaluationRequest, HttpAnalysisClient};
use affect_orchestrator::error::CaptureError;
use affect_orchestrator::http::{create_router, AppState};
use affect_orchestrator::session::{SessionConfig, SessionHandle, SessionOrchestrator};
use axum::{
    body::{Body, Bytes},
    http::{Request, StatusCode},
    routing::post,
    Json, Router,
};
use common::{mock_controller, CountingTransport, MockAnalysis};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower::ServiceExt;

fn app() -> Router {
    let orchestrator = SessionOrchestrator::new(
        SessionConfig::default(),
        mock_controller(),
        Arc::new(MockAnalysis::new()),
        CountingTransport::new(Duration::ZERO),
    );
    let (_results_tx, results_rx) = mpsc::channel(8);
    let (session, _task) = SessionHandle::spawn(orchestrator, results_rx);
    create_router(AppState::new(session))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&body)?)
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body)?).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    Ok((status, value))
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let (status, body) = call(&app(), "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_snapshot_of_fresh_session() -> Result<()> {
    let (status, body) = call(&app(), "GET", "/session/snapshot", None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["camera"], "inactive");
    assert_eq!(body["recording"]["state"], "inactive");
    assert_eq!(body["intensity"]["status"], "stable");
    assert_eq!(body["risk_warnings"], json!([]));
    assert!(body["report"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_frame_without_camera_is_unavailable() -> Result<()> {
    let (status, body) = call(&app(), "POST", "/session/frame", None).await?;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap_or("").contains("Device unavailable"));
    Ok(())
}

#[tokio::test]
async fn test_camera_toggle_round_trip() -> Result<()> {
    let app = app();

    let (status, body) = call(&app, "POST", "/session/camera/toggle", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["camera"], "active");

    let (_, body) = call(&app, "POST", "/session/frame", None).await?;
    assert_eq!(body["modality"], "face");
    assert_eq!(body["intensity"]["band"], "medium");

    let (_, body) = call(&app, "POST", "/session/camera/toggle", None).await?;
    assert_eq!(body["camera"], "inactive");
    Ok(())
}

#[tokio::test]
async fn test_text_and_report_routes() -> Result<()> {
    let app = app();

    let (status, body) = call(&app, "POST", "/session/text", Some(json!({"text": "  "}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analyzed"], false);

    let (_, body) = call(&app, "POST", "/session/text", Some(json!({"text": "so tired"}))).await?;
    assert_eq!(body["analyzed"], true);

    let (status, body) = call(&app, "POST", "/session/report", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_level"], "high");
    assert_eq!(body["communication"], "mild barrier");
    assert_eq!(body["recommendations"][0]["priority"], "high");

    let (status, _) = call(&app, "DELETE", "/session/text", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = call(&app, "POST", "/session/assistant", Some(json!({"query": "Any risk?"}))).await?;
    assert!(body["answer"].as_str().unwrap_or("").starts_with("1 risk warning(s)"));
    Ok(())
}

// ============================================================================
// Analysis client against a fake backend
// ============================================================================

async fn fake_backend() -> Result<String> {
    let router = Router::new()
        .route(
            "/api/analyze/face",
            post(|Json(body): Json<Value>| async move {
                let image = body["image"].as_str().unwrap_or("").to_string();
                Json(json!({
                    "status": "success",
                    "data": {"intensity": 40, "echo": image}
                }))
            }),
        )
        .route(
            "/api/analyze/voice",
            post(|body: Bytes| async move {
                let text = String::from_utf8_lossy(&body).to_string();
                Json(json!({
                    "status": "success",
                    "data": {
                        "has_file": text.contains("name=\"audio\"") && text.contains("recording.wav"),
                        "intensity": 70
                    }
                }))
            }),
        )
        .route(
            "/api/analyze/text",
            post(|| async { Json(json!({"status": "error", "message": "model not loaded"})) }),
        )
        .route(
            "/api/evaluate/comprehensive",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "evaluation crashed") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(format!("http://{}/", addr))
}

#[tokio::test]
async fn test_client_unwraps_success_envelope() -> Result<()> {
    let base_url = fake_backend().await?;
    let client = HttpAnalysisClient::new(&base_url)?;
    assert!(!client.base_url().ends_with('/'));

    let data = client.analyze_face("data:image/jpeg;base64,AAAA").await?;
    assert_eq!(data["intensity"], 40);
    assert_eq!(data["echo"], "data:image/jpeg;base64,AAAA");

    let data = client.analyze_voice(b"RIFF....WAVE".to_vec()).await?;
    assert_eq!(data["has_file"], true);
    Ok(())
}

#[tokio::test]
async fn test_client_failures_are_transport_errors() -> Result<()> {
    let base_url = fake_backend().await?;
    let client = HttpAnalysisClient::new(&base_url)?;

    let err = client.analyze_text("hello").await.unwrap_err();
    assert!(matches!(err, CaptureError::TransportFailure(ref m) if m.contains("model not loaded")));

    let request = EvaluationRequest {
        face_data: None,
        voice_data: None,
        text_data: None,
    };
    let err = client.evaluate(&request).await.unwrap_err();
    assert!(matches!(err, CaptureError::TransportFailure(ref m) if m.contains("500")));
    Ok(())
}

#[tokio::test]
async fn test_client_unreachable_backend() -> Result<()> {
    // Bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = HttpAnalysisClient::new(&format!("http://{}", addr))?;
    let err = client.analyze_text("hello").await.unwrap_err();
    assert!(matches!(err, CaptureError::TransportFailure(_)));
    Ok(())
}
