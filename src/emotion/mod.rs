//! Emotion vocabulary and intensity classification
//!
//! Pure functions shared by result ingestion and report aggregation:
//! - label canonicalization onto the six-emotion vocabulary
//! - intensity banding (low / medium / high)
//! - the per-session emotion distribution

mod distribution;
mod intensity;
mod vocabulary;

pub use distribution::EmotionDistribution;
pub use intensity::{clamp_intensity, classify, Classification, IntensityBand, IntensityState};
pub use vocabulary::{canonicalize, CanonicalEmotion, EmotionKey};
