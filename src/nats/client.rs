use anyhow::{Context, Result};
use async_nats::Client;
use futures::stream::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::messages::{FrameMessage, ResultNotification};
use crate::error::CaptureError;
use crate::ingest::ModalityResult;
use crate::streaming::FrameTransport;

pub struct NatsClient {
    client: Client,
    session_id: String,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str, session_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client, session_id })
    }

    pub fn frame_subject(&self) -> String {
        format!("analysis.frame.{}", self.session_id)
    }

    pub fn result_subject(&self) -> String {
        format!("analysis.result.{}", self.session_id)
    }

    /// Publish a live frame for face analysis
    pub async fn publish_frame(&self, message: &FrameMessage) -> Result<(), CaptureError> {
        let subject = self.frame_subject();
        let payload = serde_json::to_vec(message)
            .map_err(|e| CaptureError::transport(format!("Failed to encode frame: {}", e)))?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .map_err(|e| CaptureError::transport(format!("Failed to publish frame: {}", e)))?;

        debug!(
            "Published frame to {} (sequence={}, bytes={})",
            subject,
            message.sequence,
            message.frame.len()
        );

        Ok(())
    }

    /// Subscribe to analysis results for this session
    pub async fn subscribe_results(&self) -> Result<async_nats::Subscriber> {
        let subject = self.result_subject();

        info!("Subscribing to analysis results on {}", subject);

        let subscriber = self
            .client
            .subscribe(subject.clone())
            .await
            .context("Failed to subscribe to analysis results")?;

        info!("Subscribed to {}", subject);

        Ok(subscriber)
    }

    /// Forward decoded result notifications to the session until either side closes
    pub fn spawn_result_listener(
        &self,
        mut subscriber: async_nats::Subscriber,
        results_tx: mpsc::Sender<ModalityResult>,
    ) -> JoinHandle<()> {
        let session_id = self.session_id.clone();

        tokio::spawn(async move {
            info!("Result listener started");

            while let Some(msg) = subscriber.next().await {
                match decode_notification(&msg.payload, &session_id) {
                    Ok(Some(result)) => {
                        if results_tx.send(result).await.is_err() {
                            warn!("Session closed, dropping result listener");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("Failed to parse result notification: {}", e),
                }
            }

            info!("Result listener stopped");
        })
    }
}

/// Parse a notification payload. `Ok(None)` means it belongs to another session.
pub fn decode_notification(
    payload: &[u8],
    session_id: &str,
) -> Result<Option<ModalityResult>, CaptureError> {
    let notification: ResultNotification = serde_json::from_slice(payload)
        .map_err(|e| CaptureError::malformed(e.to_string()))?;

    if let Some(other) = notification.session_id.as_deref() {
        if other != session_id {
            return Ok(None);
        }
    }

    ModalityResult::from_notification(&notification.modality, &notification.result).map(Some)
}

#[async_trait::async_trait]
impl FrameTransport for NatsClient {
    async fn submit(&self, frame: FrameMessage) -> Result<(), CaptureError> {
        self.publish_frame(&frame).await
    }
}
