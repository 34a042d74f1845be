use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::assistant;
use super::config::SessionConfig;
use super::snapshot::{LatestResults, RecordingStatus, VisualizationSnapshot};
use super::state::SessionState;
use crate::analysis::{AnalysisBackend, EvaluationRequest};
use crate::capture::{AudioBlob, CaptureController, DeviceState};
use crate::error::CaptureError;
use crate::ingest::{IngestOutcome, Modality, ModalityResult, ResultIngestor};
use crate::report::{ComprehensiveReport, ReportAggregator};
use crate::streaming::{encode_frame, FrameTransport, StreamStats, StreamingLoop};

/// Outcome of the recording toggle
#[derive(Debug, Clone)]
pub struct RecordingToggle {
    pub status: RecordingStatus,
    /// Sealed recording, present when this toggle stopped a recording
    pub blob: Option<AudioBlob>,
}

/// Sole owner of the session state; executes the commands the UI issues.
///
/// Methods that talk to the analysis backend come in two forms: a direct
/// async method that awaits the backend, and prepare/apply halves used by
/// `SessionHandle` so the command loop never waits on the network.
pub struct SessionOrchestrator {
    config: SessionConfig,
    state: SessionState,
    capture: CaptureController,
    backend: Arc<dyn AnalysisBackend>,
    transport: Arc<dyn FrameTransport>,
    ingestor: ResultIngestor,
    aggregator: ReportAggregator,
    streaming: Option<JoinHandle<StreamStats>>,
}

impl SessionOrchestrator {
    pub fn new(
        config: SessionConfig,
        capture: CaptureController,
        backend: Arc<dyn AnalysisBackend>,
        transport: Arc<dyn FrameTransport>,
    ) -> Self {
        info!("Creating session orchestrator: {}", config.session_id);

        Self {
            state: SessionState::new(config.session_id.clone()),
            config,
            capture,
            backend,
            transport,
            ingestor: ResultIngestor::new(),
            aggregator: ReportAggregator::new(),
            streaming: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn capture(&self) -> &CaptureController {
        &self.capture
    }

    pub fn backend(&self) -> Arc<dyn AnalysisBackend> {
        Arc::clone(&self.backend)
    }

    // ------------------------------------------------------------------
    // Devices
    // ------------------------------------------------------------------

    pub async fn toggle_camera(&mut self) -> Result<DeviceState, CaptureError> {
        if self.capture.video_state() == DeviceState::Active {
            self.stop_camera().await;
        } else {
            self.start_camera().await?;
        }
        Ok(self.capture.video_state())
    }

    /// Acquire the camera and start streaming live frames
    pub async fn start_camera(&mut self) -> Result<(), CaptureError> {
        if self.capture.video_state() == DeviceState::Active {
            return Ok(());
        }

        let stream = self.capture.start_video().await?;
        let streaming = StreamingLoop::new(
            stream,
            Arc::clone(&self.transport),
            self.config.streaming(),
        );
        self.streaming = Some(streaming.spawn());
        Ok(())
    }

    /// Release the camera. The streaming loop winds down on its own.
    pub async fn stop_camera(&mut self) {
        self.capture.stop_video().await;
        // Detach: the loop observes the cancelled token and exits
        self.streaming.take();
    }

    pub async fn toggle_recording(&mut self) -> Result<RecordingToggle, CaptureError> {
        let blob = if self.capture.audio_state() == DeviceState::Active {
            self.capture.stop_audio().await
        } else {
            self.capture.start_audio().await?;
            None
        };

        Ok(RecordingToggle {
            status: self.recording_status(),
            blob,
        })
    }

    pub fn recording_status(&self) -> RecordingStatus {
        let recording = self.capture.recording();
        RecordingStatus {
            state: self.capture.audio_state(),
            elapsed_secs: recording.map(|r| r.elapsed_secs()).unwrap_or(0),
            chunk_count: recording.map(|r| r.chunk_count()).unwrap_or(0),
            has_blob: recording.map(|r| r.is_sealed()).unwrap_or(false),
            started_at: recording.map(|r| r.started_at()),
        }
    }

    // ------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------

    /// Apply an analysis result, from a notification or a one-shot request
    pub fn ingest(&mut self, result: ModalityResult) -> IngestOutcome {
        self.ingestor.ingest(&mut self.state, result)
    }

    /// Encode the current camera frame for one-shot analysis
    pub fn prepare_frame(&self) -> Result<String, CaptureError> {
        if self.capture.video_state() != DeviceState::Active {
            return Err(CaptureError::device("Camera is not active"));
        }
        let frame = self
            .capture
            .latest_frame()
            .ok_or_else(|| CaptureError::device("No frame captured yet"))?;
        encode_frame(&frame, self.config.jpeg_quality)
    }

    /// Analyze the current frame once and ingest the result
    pub async fn capture_frame(&mut self) -> Result<IngestOutcome, CaptureError> {
        let image = self.prepare_frame()?;
        let data = self.backend.analyze_face(&image).await?;
        Ok(self.ingest(ModalityResult::decode(Modality::Face, &data)))
    }

    /// Send a sealed recording for voice analysis and ingest the result
    pub async fn analyze_recording(&mut self, blob: &AudioBlob) -> Result<IngestOutcome, CaptureError> {
        let wav = blob
            .to_wav()
            .map_err(|e| CaptureError::malformed(format!("Cannot encode recording: {:#}", e)))?;
        let data = self.backend.analyze_voice(wav).await?;
        Ok(self.ingest(ModalityResult::decode(Modality::Voice, &data)))
    }

    /// Analyze free text. Blank input is ignored and returns `None`.
    pub async fn submit_text(&mut self, text: &str) -> Result<Option<IngestOutcome>, CaptureError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let data = self.backend.analyze_text(text).await?;
        Ok(Some(self.ingest(ModalityResult::decode(Modality::Text, &data))))
    }

    /// Forget the latest text analysis
    pub fn clear_text(&mut self) {
        if self.state.clear_modality(Modality::Text).is_some() {
            info!("Cleared text analysis");
        }
    }

    // ------------------------------------------------------------------
    // Report
    // ------------------------------------------------------------------

    pub fn evaluation_request(&self) -> EvaluationRequest {
        EvaluationRequest::from_state(&self.state)
    }

    /// Aggregate an evaluation payload and replace warnings and report
    pub fn apply_evaluation(&mut self, payload: &Value) -> ComprehensiveReport {
        let aggregation = self.aggregator.aggregate(&self.state, payload);
        self.state.risk_warnings = aggregation.warnings;
        self.state.report = Some(aggregation.report.clone());
        aggregation.report
    }

    pub async fn generate_report(&mut self) -> Result<ComprehensiveReport, CaptureError> {
        let request = self.evaluation_request();
        if request.is_empty() {
            warn!("Generating report without any captured modality");
        }
        let payload = self.backend.evaluate(&request).await?;
        Ok(self.apply_evaluation(&payload))
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> VisualizationSnapshot {
        let raw = |modality| self.state.latest(modality).map(|r| r.raw().clone());

        VisualizationSnapshot {
            session_id: self.config.session_id.clone(),
            taken_at: chrono::Utc::now(),
            emotion_distribution: self.state.emotion_distribution().clone(),
            intensity: self.state.intensity(),
            risk_warnings: self.state.risk_warnings().to_vec(),
            report: self.state.report().cloned(),
            camera: self.capture.video_state(),
            recording: self.recording_status(),
            latest: LatestResults {
                face: raw(Modality::Face),
                voice: raw(Modality::Voice),
                text: raw(Modality::Text),
            },
        }
    }

    pub fn ask(&self, query: &str) -> String {
        assistant::respond(&self.snapshot(), query)
    }

    /// Release every device
    pub async fn shutdown(&mut self) {
        info!("Shutting down session {}", self.config.session_id);
        self.stop_camera().await;
        self.capture.shutdown().await;
    }
}
