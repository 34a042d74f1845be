pub mod analysis;
pub mod capture;
pub mod config;
pub mod emotion;
pub mod error;
pub mod http;
pub mod ingest;
pub mod nats;
pub mod report;
pub mod session;
pub mod streaming;

pub use analysis::{AnalysisBackend, AnalysisFrameTransport, EvaluationRequest, HttpAnalysisClient};
pub use capture::{
    AudioBackend, AudioBlob, CaptureBackendFactory, CaptureController, CaptureSource, DeviceState,
    VideoBackend, VideoFrame,
};
pub use config::Config;
pub use emotion::{canonicalize, classify, CanonicalEmotion, EmotionDistribution, IntensityBand, IntensityState};
pub use error::CaptureError;
pub use http::{create_router, AppState};
pub use ingest::{IngestOutcome, Modality, ModalityResult, ResultIngestor};
pub use nats::{FrameMessage, NatsClient, ResultNotification};
pub use report::{ComprehensiveReport, ReportAggregator, RiskLevel, RiskWarning};
pub use session::{SessionConfig, SessionHandle, SessionOrchestrator, SessionState, VisualizationSnapshot};
pub use streaming::{FrameTransport, StreamingConfig, StreamingLoop};
