use std::collections::BTreeMap;

use crate::emotion::{EmotionDistribution, IntensityState};
use crate::ingest::{Modality, ModalityResult};
use crate::report::{ComprehensiveReport, RiskWarning};

/// Analysis state of the single active session.
///
/// Owned by the orchestrator. The distribution and intensity are written
/// only by the result ingestor; warnings and report are replaced wholesale
/// on each report generation.
#[derive(Debug, Clone)]
pub struct SessionState {
    session_id: String,
    pub(crate) latest: BTreeMap<Modality, ModalityResult>,
    pub(crate) emotion_distribution: EmotionDistribution,
    pub(crate) intensity: IntensityState,
    pub(crate) risk_warnings: Vec<RiskWarning>,
    pub(crate) report: Option<ComprehensiveReport>,
}

impl SessionState {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            latest: BTreeMap::new(),
            emotion_distribution: EmotionDistribution::new(),
            intensity: IntensityState::default(),
            risk_warnings: Vec::new(),
            report: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Latest result received for a modality
    pub fn latest(&self, modality: Modality) -> Option<&ModalityResult> {
        self.latest.get(&modality)
    }

    /// Modalities with at least one result, in fixed order
    pub fn modalities(&self) -> Vec<Modality> {
        self.latest.keys().copied().collect()
    }

    pub fn emotion_distribution(&self) -> &EmotionDistribution {
        &self.emotion_distribution
    }

    pub fn intensity(&self) -> IntensityState {
        self.intensity
    }

    pub fn risk_warnings(&self) -> &[RiskWarning] {
        &self.risk_warnings
    }

    pub fn report(&self) -> Option<&ComprehensiveReport> {
        self.report.as_ref()
    }

    pub(crate) fn clear_modality(&mut self, modality: Modality) -> Option<ModalityResult> {
        self.latest.remove(&modality)
    }
}
