use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::capture::DeviceState;
use crate::emotion::{EmotionDistribution, IntensityState};
use crate::report::{ComprehensiveReport, RiskWarning};

/// Status of the audio recording
#[derive(Debug, Clone, Serialize)]
pub struct RecordingStatus {
    pub state: DeviceState,

    /// Seconds elapsed in the current (or last) recording
    pub elapsed_secs: u64,

    /// Number of audio chunks collected so far
    pub chunk_count: usize,

    /// Whether a sealed blob is available
    pub has_blob: bool,

    /// When the current (or last) recording started
    pub started_at: Option<DateTime<Utc>>,
}

/// Raw payloads of the latest result per modality, for the detail charts
#[derive(Debug, Clone, Default, Serialize)]
pub struct LatestResults {
    pub face: Option<Value>,
    pub voice: Option<Value>,
    pub text: Option<Value>,
}

/// Read-only view handed to the rendering layer
#[derive(Debug, Clone, Serialize)]
pub struct VisualizationSnapshot {
    pub session_id: String,
    pub taken_at: DateTime<Utc>,
    pub emotion_distribution: EmotionDistribution,
    pub intensity: IntensityState,
    pub risk_warnings: Vec<RiskWarning>,
    pub report: Option<ComprehensiveReport>,
    pub camera: DeviceState,
    pub recording: RecordingStatus,
    pub latest: LatestResults,
}
