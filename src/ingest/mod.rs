//! Analysis result ingestion
//!
//! Backend payloads arrive from streaming notifications and one-shot
//! requests. They are decoded into a tagged `ModalityResult` and folded
//! into session state by the `ResultIngestor`.

mod ingestor;
mod result;

pub use ingestor::{IngestOutcome, ResultIngestor};
pub use result::{FaceResult, Modality, ModalityResult, ProsodyDescriptor, TextResult, VoiceResult};
