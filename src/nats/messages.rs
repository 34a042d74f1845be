use serde::{Deserialize, Serialize};

/// Live video frame submitted for face analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameMessage {
    pub session_id: String,
    pub sequence: u64,
    /// Always "face" for the video path
    pub modality: String,
    pub frame: String, // data:image/jpeg;base64,...
    pub timestamp: String, // RFC3339 timestamp
}

/// Asynchronous analysis result pushed back by the analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultNotification {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(alias = "type")]
    pub modality: String,
    #[serde(default)]
    pub result: serde_json::Value,
}
