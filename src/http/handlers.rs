use super::state::AppState;
use crate::capture::DeviceState;
use crate::error::CaptureError;
use crate::ingest::IngestOutcome;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitTextResponse {
    /// False when the text was blank and nothing was sent
    pub analyzed: bool,
    pub outcome: Option<IngestOutcome>,
}

#[derive(Debug, Serialize)]
pub struct CameraResponse {
    pub camera: DeviceState,
}

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(err: CaptureError) -> Response {
    let status = match &err {
        CaptureError::DeviceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CaptureError::TransportFailure(_) => StatusCode::BAD_GATEWAY,
        CaptureError::MalformedResult(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CaptureError::SessionClosed => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        warn!("Request failed: {}", err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /session/snapshot
/// Current visualization snapshot
pub async fn get_snapshot(State(state): State<AppState>) -> Response {
    match state.session.snapshot().await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /session/camera/toggle
pub async fn toggle_camera(State(state): State<AppState>) -> Response {
    match state.session.toggle_camera().await {
        Ok(camera) => {
            info!("Camera is now {:?}", camera);
            (StatusCode::OK, Json(CameraResponse { camera })).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /session/recording/toggle
/// Stopping a recording queues it for voice analysis
pub async fn toggle_recording(State(state): State<AppState>) -> Response {
    match state.session.toggle_recording().await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /session/frame
/// Analyze the current camera frame once
pub async fn capture_frame(State(state): State<AppState>) -> Response {
    match state.session.capture_frame().await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /session/text
pub async fn submit_text(
    State(state): State<AppState>,
    Json(req): Json<SubmitTextRequest>,
) -> Response {
    match state.session.submit_text(&req.text).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(SubmitTextResponse {
                analyzed: outcome.is_some(),
                outcome,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /session/text
pub async fn clear_text(State(state): State<AppState>) -> Response {
    match state.session.clear_text().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /session/report
/// Run the comprehensive evaluation over all captured modalities
pub async fn generate_report(State(state): State<AppState>) -> Response {
    match state.session.generate_report().await {
        Ok(report) => {
            info!("Generated report {}", report.id);
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /session/assistant
pub async fn ask_assistant(
    State(state): State<AppState>,
    Json(req): Json<AssistantRequest>,
) -> Response {
    match state.session.ask(&req.query).await {
        Ok(answer) => (StatusCode::OK, Json(AssistantResponse { answer })).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
