use serde::Serialize;
use tracing::{debug, info};

use super::result::{Modality, ModalityResult};
use crate::emotion::IntensityState;
use crate::session::SessionState;

/// What a single ingestion changed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestOutcome {
    pub modality: Modality,
    /// Distribution entries overwritten
    pub emotions_updated: usize,
    /// New intensity, when the result carried one
    pub intensity: Option<IntensityState>,
}

/// Folds analysis results into session state.
///
/// The only writer of the emotion distribution and the intensity state.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResultIngestor;

impl ResultIngestor {
    pub fn new() -> Self {
        Self
    }

    pub fn ingest(&self, state: &mut SessionState, result: ModalityResult) -> IngestOutcome {
        let modality = result.modality();

        let emotions_updated = match result.emotion_scores() {
            Some(scores) => state.emotion_distribution.apply_scores(scores),
            None => 0,
        };

        let intensity = result.intensity().map(|value| {
            let intensity = IntensityState::from_value(value);
            state.intensity = intensity;
            intensity
        });

        if let Some(intensity) = &intensity {
            info!(
                "Ingested {} result: intensity {:.1} ({}), {} emotions updated",
                modality,
                intensity.value(),
                intensity.band().as_str(),
                emotions_updated
            );
        } else {
            debug!("Ingested {} result: {} emotions updated", modality, emotions_updated);
        }

        // Latest wins; no ordering guard between results of one modality
        state.latest.insert(modality, result);

        IngestOutcome {
            modality,
            emotions_updated,
            intensity,
        }
    }
}
