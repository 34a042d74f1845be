use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use super::encode::encode_frame;
use crate::capture::VideoStream;
use crate::error::CaptureError;
use crate::nats::FrameMessage;

/// Outbound seam for live frames. Fire-and-forget: no response is needed.
#[async_trait::async_trait]
pub trait FrameTransport: Send + Sync {
    async fn submit(&self, frame: FrameMessage) -> Result<(), CaptureError>;
}

#[derive(Debug, Clone)]
pub struct StreamingConfig {
    pub session_id: String,
    /// Delay between cycles (display refresh)
    pub frame_interval: Duration,
    pub jpeg_quality: u8,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            frame_interval: Duration::from_millis(16),
            jpeg_quality: 80,
        }
    }
}

/// Counters reported when the loop ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub cycles: u64,
    pub frames_submitted: u64,
    /// Frames issued while the previous submission was still running
    pub frames_superseded: u64,
}

/// Samples the current frame once per cycle and hands it to the transport
/// while video is active.
pub struct StreamingLoop {
    stream: VideoStream,
    transport: Arc<dyn FrameTransport>,
    config: StreamingConfig,
}

impl StreamingLoop {
    pub fn new(
        stream: VideoStream,
        transport: Arc<dyn FrameTransport>,
        config: StreamingConfig,
    ) -> Self {
        Self {
            stream,
            transport,
            config,
        }
    }

    pub fn spawn(self) -> JoinHandle<StreamStats> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) -> StreamStats {
        let StreamingLoop {
            stream,
            transport,
            config,
        } = self;

        info!(
            "Streaming loop started for {} (every {:?})",
            config.session_id, config.frame_interval
        );

        let mut ticker = tokio::time::interval(config.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut stats = StreamStats::default();
        let mut in_flight: Option<JoinHandle<()>> = None;

        loop {
            // Cooperative cancellation: checked once per cycle
            if stream.token.is_cancelled() {
                break;
            }
            stats.cycles += 1;

            let frame = stream.frames.borrow().clone();
            if let Some(frame) = frame {
                match encode_frame(&frame, config.jpeg_quality) {
                    Ok(encoded) => {
                        // Submissions are detached. A slow one is overtaken, never
                        // cancelled; the ingestor keeps only the latest result.
                        if let Some(previous) = in_flight.take() {
                            if !previous.is_finished() {
                                stats.frames_superseded += 1;
                                debug!("Frame issued while previous submission is still running");
                            }
                        }

                        let message = FrameMessage {
                            session_id: config.session_id.clone(),
                            sequence: stats.frames_submitted,
                            modality: "face".to_string(),
                            frame: encoded,
                            timestamp: Utc::now().to_rfc3339(),
                        };
                        stats.frames_submitted += 1;

                        let transport = Arc::clone(&transport);
                        in_flight = Some(tokio::spawn(async move {
                            let sequence = message.sequence;
                            if let Err(e) = transport.submit(message).await {
                                error!("Failed to submit frame {}: {}", sequence, e);
                            }
                        }));
                    }
                    Err(e) => error!("Failed to encode frame: {}", e),
                }
            }

            tokio::select! {
                _ = ticker.tick() => {}
                _ = stream.token.cancelled() => break,
            }
        }

        info!(
            "Streaming loop stopped for {}: {} cycles, {} frames submitted, {} superseded",
            config.session_id, stats.cycles, stats.frames_submitted, stats.frames_superseded
        );

        stats
    }
}
