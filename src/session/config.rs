use std::time::Duration;

use crate::streaming::StreamingConfig;

/// Configuration for the capture session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "session-2f1c...")
    pub session_id: String,

    /// Delay between live frame samples
    /// Default: 16ms (~60Hz display refresh)
    pub frame_interval: Duration,

    /// JPEG quality for streamed and one-shot frames (1-100)
    pub jpeg_quality: u8,
}

impl SessionConfig {
    pub fn streaming(&self) -> StreamingConfig {
        StreamingConfig {
            session_id: self.session_id.clone(),
            frame_interval: self.frame_interval,
            jpeg_quality: self.jpeg_quality,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            frame_interval: Duration::from_millis(16),
            jpeg_quality: 80,
        }
    }
}
