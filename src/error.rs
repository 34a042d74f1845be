use thiserror::Error;

/// Failures surfaced by the capture and aggregation core.
///
/// None of these are fatal: each one degrades a single operation and
/// leaves previously accumulated session state intact.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// Permission denied or no hardware behind the requested device
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Submission/fetch rejected or network error
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// Backend payload could not be interpreted at all
    #[error("Malformed result: {0}")]
    MalformedResult(String),

    /// The session command loop is no longer running
    #[error("Session orchestrator is not running")]
    SessionClosed,
}

impl CaptureError {
    pub fn device(msg: impl Into<String>) -> Self {
        Self::DeviceUnavailable(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportFailure(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResult(msg.into())
    }
}

impl From<reqwest::Error> for CaptureError {
    fn from(err: reqwest::Error) -> Self {
        Self::TransportFailure(err.to_string())
    }
}
