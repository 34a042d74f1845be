//! HTTP API for the dashboard front end
//!
//! - GET /health - Health check
//! - GET /session/snapshot - Current visualization snapshot
//! - POST /session/camera/toggle - Start or stop the camera
//! - POST /session/recording/toggle - Start or stop recording
//! - POST /session/frame - Analyze the current frame once
//! - POST /session/text, DELETE /session/text - Analyze or clear text
//! - POST /session/report - Generate the comprehensive report
//! - POST /session/assistant - Ask the assistant

mod handlers;
mod routes;
mod state;

pub use handlers::ErrorResponse;
pub use routes::create_router;
pub use state::AppState;
