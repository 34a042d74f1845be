use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use super::client::AnalysisBackend;
use crate::error::CaptureError;
use crate::ingest::{Modality, ModalityResult};
use crate::nats::FrameMessage;
use crate::streaming::FrameTransport;

/// Streams frames through the one-shot face endpoint and pushes each answer
/// back as an asynchronous result. Used when no NATS server is configured.
pub struct AnalysisFrameTransport {
    backend: Arc<dyn AnalysisBackend>,
    results_tx: mpsc::Sender<ModalityResult>,
}

impl AnalysisFrameTransport {
    pub fn new(backend: Arc<dyn AnalysisBackend>, results_tx: mpsc::Sender<ModalityResult>) -> Self {
        Self {
            backend,
            results_tx,
        }
    }
}

#[async_trait::async_trait]
impl FrameTransport for AnalysisFrameTransport {
    async fn submit(&self, frame: FrameMessage) -> Result<(), CaptureError> {
        let data = self.backend.analyze_face(&frame.frame).await?;
        let result = ModalityResult::decode(Modality::Face, &data);

        if self.results_tx.send(result).await.is_err() {
            warn!("Session closed, dropping result for frame {}", frame.sequence);
            return Err(CaptureError::SessionClosed);
        }
        Ok(())
    }
}
