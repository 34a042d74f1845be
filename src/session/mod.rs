//! Session orchestration
//!
//! This module ties capture, streaming, ingestion and reporting together:
//! - `SessionState` holds the analysis data of the active session
//! - `SessionOrchestrator` executes the UI commands against that state
//! - `SessionHandle` serializes commands and pushed results through one task
//! - `VisualizationSnapshot` is the read-only view for the rendering layer

mod assistant;
mod config;
mod handle;
mod orchestrator;
mod snapshot;
mod state;

pub use assistant::respond as assistant_response;
pub use config::SessionConfig;
pub use handle::SessionHandle;
pub use orchestrator::{RecordingToggle, SessionOrchestrator};
pub use snapshot::{LatestResults, RecordingStatus, VisualizationSnapshot};
pub use state::SessionState;
