use serde::Serialize;
use std::collections::BTreeMap;

use super::vocabulary::{canonicalize, CanonicalEmotion};

/// Percentage (0-100) per canonical emotion. Every key is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmotionDistribution {
    values: BTreeMap<CanonicalEmotion, u8>,
}

impl EmotionDistribution {
    pub fn new() -> Self {
        Self {
            values: CanonicalEmotion::ALL.iter().map(|e| (*e, 0)).collect(),
        }
    }

    pub fn get(&self, emotion: CanonicalEmotion) -> u8 {
        self.values.get(&emotion).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalEmotion, u8)> + '_ {
        self.values.iter().map(|(e, v)| (*e, *v))
    }

    /// Overwrite the entries this score map has data for.
    ///
    /// Scores are fractions in [0, 1]. Labels that do not canonicalize to one
    /// of the six keys are skipped. Returns the number of entries written.
    pub(crate) fn apply_scores(&mut self, scores: &BTreeMap<String, f64>) -> usize {
        let mut updated = 0;
        for (label, score) in scores {
            if let Some(emotion) = canonicalize(label).canonical() {
                self.values.insert(emotion, score_to_percent(*score));
                updated += 1;
            }
        }
        updated
    }
}

impl Default for EmotionDistribution {
    fn default() -> Self {
        Self::new()
    }
}

fn score_to_percent(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}
