use serde::{Serialize, Serializer};

const MEDIUM_THRESHOLD: f64 = 30.0;
const HIGH_THRESHOLD: f64 = 70.0;

/// Discrete classification of the 0-100 emotion-intensity scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityBand {
    Low,
    Medium,
    High,
}

impl IntensityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityBand::Low => "low",
            IntensityBand::Medium => "medium",
            IntensityBand::High => "high",
        }
    }

    /// Human-readable status shown next to the gauge
    pub fn status(&self) -> &'static str {
        match self {
            IntensityBand::Low => "stable",
            IntensityBand::Medium => "moderate fluctuation",
            IntensityBand::High => "severe fluctuation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub band: IntensityBand,
    pub status: &'static str,
}

/// Bring any scalar into [0, 100]; NaN counts as 0
pub fn clamp_intensity(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Classify an intensity value. Bands are inclusive-low/exclusive-high, so
/// 30 and 70 land in the higher band.
pub fn classify(value: f64) -> Classification {
    let value = clamp_intensity(value);
    let band = if value < MEDIUM_THRESHOLD {
        IntensityBand::Low
    } else if value < HIGH_THRESHOLD {
        IntensityBand::Medium
    } else {
        IntensityBand::High
    };

    Classification {
        band,
        status: band.status(),
    }
}

/// Current intensity with its derived band and status.
///
/// Only constructible from a scalar so the derived fields can never drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityState {
    value: f64,
    classification: Classification,
}

impl IntensityState {
    pub fn from_value(value: f64) -> Self {
        let value = clamp_intensity(value);
        Self {
            value,
            classification: classify(value),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn band(&self) -> IntensityBand {
        self.classification.band
    }

    pub fn status(&self) -> &'static str {
        self.classification.status
    }
}

impl Default for IntensityState {
    fn default() -> Self {
        Self::from_value(0.0)
    }
}

impl Serialize for IntensityState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("IntensityState", 3)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("band", &self.band())?;
        state.serialize_field("status", self.status())?;
        state.end()
    }
}
