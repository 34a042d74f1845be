//! Remote analysis backend
//!
//! One-shot face/voice/text analysis and the comprehensive evaluation,
//! plus a frame transport that streams through the one-shot face endpoint.

mod client;
mod payload;
mod transport;

pub use client::{AnalysisBackend, HttpAnalysisClient};
pub use payload::{ApiEnvelope, EvaluationRequest};
pub use transport::AnalysisFrameTransport;
