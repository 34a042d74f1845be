use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::orchestrator::SessionOrchestrator;
use super::snapshot::{RecordingStatus, VisualizationSnapshot};
use crate::analysis::AnalysisBackend;
use crate::capture::{AudioBlob, DeviceState};
use crate::error::CaptureError;
use crate::ingest::{IngestOutcome, Modality, ModalityResult};
use crate::report::ComprehensiveReport;

type Reply<T> = oneshot::Sender<T>;

enum Command {
    ToggleCamera {
        reply: Reply<Result<DeviceState, CaptureError>>,
    },
    ToggleRecording {
        reply: Reply<Result<RecordingStatus, CaptureError>>,
    },
    CaptureFrame {
        reply: Reply<Result<IngestOutcome, CaptureError>>,
    },
    SubmitText {
        text: String,
        reply: Reply<Result<IngestOutcome, CaptureError>>,
    },
    ClearText {
        reply: Reply<()>,
    },
    GenerateReport {
        reply: Reply<Result<ComprehensiveReport, CaptureError>>,
    },
    Snapshot {
        reply: Reply<VisualizationSnapshot>,
    },
    Ask {
        query: String,
        reply: Reply<String>,
    },
    Ingest {
        result: ModalityResult,
        reply: Reply<IngestOutcome>,
    },
    Shutdown {
        reply: Reply<()>,
    },

    // Completions posted back by spawned backend requests
    Analyzed {
        modality: Modality,
        outcome: Result<Value, CaptureError>,
        reply: Option<Reply<Result<IngestOutcome, CaptureError>>>,
    },
    Evaluated {
        outcome: Result<Value, CaptureError>,
        reply: Reply<Result<ComprehensiveReport, CaptureError>>,
    },
}

/// Cloneable handle to a running session.
///
/// Every command is executed in order by a single task that owns the
/// `SessionOrchestrator`. Backend requests run on their own tasks and post
/// their completion back to that queue, so a slow backend never blocks
/// toggles or snapshots.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Start the command loop.
    ///
    /// `results` carries results pushed by the transport (NATS notifications
    /// or the one-shot frame transport); they are ingested in arrival order.
    pub fn spawn(
        orchestrator: SessionOrchestrator,
        results: mpsc::Receiver<ModalityResult>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(64);
        let actor = SessionActor {
            backend: orchestrator.backend(),
            orchestrator,
            loopback: tx.downgrade(),
        };
        let handle = tokio::spawn(actor.run(rx, results));
        (Self { tx }, handle)
    }

    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T, CaptureError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| CaptureError::SessionClosed)?;
        response.await.map_err(|_| CaptureError::SessionClosed)
    }

    pub async fn toggle_camera(&self) -> Result<DeviceState, CaptureError> {
        self.request(|reply| Command::ToggleCamera { reply }).await?
    }

    /// Start or stop recording. Stopping sends the recording for voice
    /// analysis in the background.
    pub async fn toggle_recording(&self) -> Result<RecordingStatus, CaptureError> {
        self.request(|reply| Command::ToggleRecording { reply }).await?
    }

    pub async fn capture_frame(&self) -> Result<IngestOutcome, CaptureError> {
        self.request(|reply| Command::CaptureFrame { reply }).await?
    }

    /// Analyze free text. Blank input is ignored and returns `None`.
    pub async fn submit_text(&self, text: &str) -> Result<Option<IngestOutcome>, CaptureError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let text = text.to_string();
        self.request(|reply| Command::SubmitText { text, reply })
            .await?
            .map(Some)
    }

    pub async fn clear_text(&self) -> Result<(), CaptureError> {
        self.request(|reply| Command::ClearText { reply }).await
    }

    pub async fn generate_report(&self) -> Result<ComprehensiveReport, CaptureError> {
        self.request(|reply| Command::GenerateReport { reply }).await?
    }

    pub async fn snapshot(&self) -> Result<VisualizationSnapshot, CaptureError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn ask(&self, query: &str) -> Result<String, CaptureError> {
        let query = query.to_string();
        self.request(|reply| Command::Ask { query, reply }).await
    }

    pub async fn ingest(&self, result: ModalityResult) -> Result<IngestOutcome, CaptureError> {
        self.request(|reply| Command::Ingest { result, reply }).await
    }

    /// Release all devices and stop the command loop
    pub async fn shutdown(&self) -> Result<(), CaptureError> {
        self.request(|reply| Command::Shutdown { reply }).await
    }
}

struct SessionActor {
    orchestrator: SessionOrchestrator,
    backend: Arc<dyn AnalysisBackend>,
    loopback: mpsc::WeakSender<Command>,
}

impl SessionActor {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut results: mpsc::Receiver<ModalityResult>,
    ) {
        info!("Session {} started", self.orchestrator.session_id());
        let mut results_open = true;

        loop {
            tokio::select! {
                command = commands.recv() => {
                    match command {
                        Some(command) => {
                            if !self.handle(command).await {
                                return;
                            }
                        }
                        None => break,
                    }
                }
                result = results.recv(), if results_open => {
                    match result {
                        Some(result) => {
                            let outcome = self.orchestrator.ingest(result);
                            debug!("Ingested pushed {} result", outcome.modality.as_str());
                        }
                        None => {
                            debug!("Result channel closed");
                            results_open = false;
                        }
                    }
                }
            }
        }

        self.orchestrator.shutdown().await;
        info!("Session {} ended", self.orchestrator.session_id());
    }

    /// Execute one command. Returns false once the session is shut down.
    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::ToggleCamera { reply } => {
                let _ = reply.send(self.orchestrator.toggle_camera().await);
            }
            Command::ToggleRecording { reply } => match self.orchestrator.toggle_recording().await {
                Ok(toggle) => {
                    if let Some(blob) = toggle.blob {
                        self.analyze_recording(blob);
                    }
                    let _ = reply.send(Ok(toggle.status));
                }
                Err(e) => {
                    let _ = reply.send(Err(e));
                }
            },
            Command::CaptureFrame { reply } => match self.orchestrator.prepare_frame() {
                Ok(image) => {
                    let backend = Arc::clone(&self.backend);
                    self.dispatch(Modality::Face, Some(reply), async move {
                        backend.analyze_face(&image).await
                    });
                }
                Err(e) => {
                    let _ = reply.send(Err(e));
                }
            },
            Command::SubmitText { text, reply } => {
                let backend = Arc::clone(&self.backend);
                self.dispatch(Modality::Text, Some(reply), async move {
                    backend.analyze_text(&text).await
                });
            }
            Command::ClearText { reply } => {
                self.orchestrator.clear_text();
                let _ = reply.send(());
            }
            Command::GenerateReport { reply } => {
                let request = self.orchestrator.evaluation_request();
                if request.is_empty() {
                    warn!("Generating report without any captured modality");
                }
                let backend = Arc::clone(&self.backend);
                let loopback = self.loopback.clone();
                tokio::spawn(async move {
                    let outcome = backend.evaluate(&request).await;
                    if let Some(tx) = loopback.upgrade() {
                        let _ = tx.send(Command::Evaluated { outcome, reply }).await;
                    }
                });
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.orchestrator.snapshot());
            }
            Command::Ask { query, reply } => {
                let _ = reply.send(self.orchestrator.ask(&query));
            }
            Command::Ingest { result, reply } => {
                let _ = reply.send(self.orchestrator.ingest(result));
            }
            Command::Analyzed {
                modality,
                outcome,
                reply,
            } => {
                let outcome = outcome
                    .map(|data| self.orchestrator.ingest(ModalityResult::decode(modality, &data)));
                match reply {
                    Some(reply) => {
                        let _ = reply.send(outcome);
                    }
                    None => {
                        if let Err(e) = outcome {
                            error!("{} analysis failed: {}", modality.as_str(), e);
                        }
                    }
                }
            }
            Command::Evaluated { outcome, reply } => {
                let report = outcome.map(|payload| self.orchestrator.apply_evaluation(&payload));
                let _ = reply.send(report);
            }
            Command::Shutdown { reply } => {
                self.orchestrator.shutdown().await;
                info!("Session {} shut down", self.orchestrator.session_id());
                let _ = reply.send(());
                return false;
            }
        }
        true
    }

    fn analyze_recording(&self, blob: AudioBlob) {
        info!(
            "Sending {:.1}s recording for voice analysis",
            blob.duration_secs()
        );
        let backend = Arc::clone(&self.backend);
        self.dispatch(Modality::Voice, None, async move {
            let wav = blob
                .to_wav()
                .map_err(|e| CaptureError::malformed(format!("Cannot encode recording: {:#}", e)))?;
            backend.analyze_voice(wav).await
        });
    }

    fn dispatch<F>(
        &self,
        modality: Modality,
        reply: Option<Reply<Result<IngestOutcome, CaptureError>>>,
        request: F,
    ) where
        F: std::future::Future<Output = Result<Value, CaptureError>> + Send + 'static,
    {
        let loopback = self.loopback.clone();
        tokio::spawn(async move {
            let outcome = request.await;
            match loopback.upgrade() {
                Some(tx) => {
                    let _ = tx
                        .send(Command::Analyzed {
                            modality,
                            outcome,
                            reply,
                        })
                        .await;
                }
                None => debug!("Session closed before {} analysis completed", modality.as_str()),
            }
        });
    }
}
