use serde::{Serialize, Serializer};
use serde_json::Value;

/// Severity reported by the backend for one risk entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// Canonical risk categories produced by the evaluator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RiskType {
    Anxiety,
    Depression,
    Anger,
    Trauma,
    OverallPsychologicalRisk,
    EmotionalCrisis,
    SelfHarmRisk,
    Other(String),
}

impl RiskType {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "anxiety" => RiskType::Anxiety,
            "depression" => RiskType::Depression,
            "anger" => RiskType::Anger,
            "trauma" => RiskType::Trauma,
            "overall_psychological_risk" => RiskType::OverallPsychologicalRisk,
            "emotional_crisis" => RiskType::EmotionalCrisis,
            "self_harm_risk" => RiskType::SelfHarmRisk,
            other => RiskType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RiskType::Anxiety => "anxiety",
            RiskType::Depression => "depression",
            RiskType::Anger => "anger",
            RiskType::Trauma => "trauma",
            RiskType::OverallPsychologicalRisk => "overall_psychological_risk",
            RiskType::EmotionalCrisis => "emotional_crisis",
            RiskType::SelfHarmRisk => "self_harm_risk",
            RiskType::Other(raw) => raw,
        }
    }

    /// Display label for warning cards
    pub fn label(&self) -> String {
        let label = match self {
            RiskType::Anxiety => "Anxiety risk",
            RiskType::Depression => "Depression risk",
            RiskType::Anger => "Anger",
            RiskType::Trauma => "Traumatic stress",
            RiskType::OverallPsychologicalRisk => "Overall psychological risk",
            RiskType::EmotionalCrisis => "Emotional crisis",
            RiskType::SelfHarmRisk => "Self-harm risk",
            RiskType::Other(raw) => return raw.clone(),
        };
        label.to_string()
    }
}

impl Serialize for RiskType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A risk entry surfaced to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskWarning {
    pub id: String,
    pub risk_type: RiskType,
    pub label: String,
    pub description: String,
    pub level: RiskLevel,
    pub timestamp: String,
}

impl RiskWarning {
    /// Build a warning from one backend `psychological_risks` entry.
    ///
    /// Missing fields fall back to defaults: an unknown level counts as low,
    /// a missing timestamp becomes "N/A".
    pub fn from_entry(id: String, entry: &Value) -> Self {
        let raw_level = entry.get("level").and_then(Value::as_str);
        let level = raw_level.and_then(RiskLevel::parse);
        let risk_type = RiskType::from_raw(entry.get("type").and_then(Value::as_str).unwrap_or("unknown"));

        Self {
            id,
            label: risk_type.label(),
            risk_type,
            description: describe(level).to_string(),
            level: level.unwrap_or(RiskLevel::Low),
            timestamp: entry
                .get("timestamp")
                .and_then(Value::as_str)
                .unwrap_or("N/A")
                .to_string(),
        }
    }
}

fn describe(level: Option<RiskLevel>) -> &'static str {
    match level {
        Some(RiskLevel::High) | Some(RiskLevel::Critical) => {
            "requires immediate attention and professional intervention"
        }
        Some(RiskLevel::Medium) => "monitor closely and take preventive measures",
        Some(RiskLevel::Low) => "risk is manageable; continue observing",
        None => "requires further assessment",
    }
}

/// Overall level: high if any entry is high/critical, else medium if any is
/// medium, else low (including no entries at all).
pub fn overall_risk_level<'a>(levels: impl IntoIterator<Item = &'a RiskLevel>) -> RiskLevel {
    let mut overall = RiskLevel::Low;
    for level in levels {
        match level {
            RiskLevel::High | RiskLevel::Critical => return RiskLevel::High,
            RiskLevel::Medium => overall = RiskLevel::Medium,
            RiskLevel::Low => {}
        }
    }
    overall
}
