use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::risk::{overall_risk_level, RiskLevel, RiskWarning};
use crate::emotion::{EmotionDistribution, IntensityState};
use crate::ingest::Modality;
use crate::session::SessionState;

const PRONOUNCED_BARRIER_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: String,
    pub priority: Priority,
    pub content: String,
    /// Risk type the intervention responds to, when the backend says so
    pub risk_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunicationAssessment {
    Good,
    MildBarrier,
    PronouncedBarrier,
}

impl CommunicationAssessment {
    pub fn from_barrier_count(count: usize) -> Self {
        match count {
            0 => CommunicationAssessment::Good,
            n if n >= PRONOUNCED_BARRIER_COUNT => CommunicationAssessment::PronouncedBarrier,
            _ => CommunicationAssessment::MildBarrier,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationAssessment::Good => "good communication",
            CommunicationAssessment::MildBarrier => "mild barrier",
            CommunicationAssessment::PronouncedBarrier => "pronounced barrier",
        }
    }
}

impl Serialize for CommunicationAssessment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Eight-axis psychological profile (0-100 per axis) for the radar chart
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RadarProfile {
    pub emotional_stability: f64,
    pub stress_level: f64,
    pub anxiety_level: f64,
    pub depression_risk: f64,
    pub cognitive_clarity: f64,
    pub social_adaptability: f64,
    pub self_control: f64,
    pub resilience: f64,
}

impl RadarProfile {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_object()?;
        let axis = |name: &str| value.get(name).and_then(Value::as_f64).unwrap_or(0.0);
        Some(Self {
            emotional_stability: axis("emotional_stability"),
            stress_level: axis("stress_level"),
            anxiety_level: axis("anxiety_level"),
            depression_risk: axis("depression_risk"),
            cognitive_clarity: axis("cognitive_clarity"),
            social_adaptability: axis("social_adaptability"),
            self_control: axis("self_control"),
            resilience: axis("resilience"),
        })
    }
}

/// The single aggregated output of a report generation. Never mutated;
/// the next generation replaces it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComprehensiveReport {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    /// Evaluation timestamp reported by the backend
    pub backend_timestamp: String,
    pub intensity_index: f64,
    pub risk_level: RiskLevel,
    pub communication: CommunicationAssessment,
    pub recommendations: Vec<Recommendation>,
    pub radar: Option<RadarProfile>,
    pub emotion_distribution: EmotionDistribution,
    pub intensity: IntensityState,
    pub modalities: Vec<Modality>,
    /// Backend payload, unmodified
    pub payload: Value,
}

/// Report plus the warning list that replaces the session's current one
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub report: ComprehensiveReport,
    pub warnings: Vec<RiskWarning>,
}

/// Turns session state and a comprehensive evaluation payload into a report.
/// Reads state only.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportAggregator;

impl ReportAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, state: &SessionState, payload: &Value) -> Aggregation {
        self.aggregate_at(state, payload, Utc::now())
    }

    /// Deterministic for a given state, payload and generation time
    pub fn aggregate_at(
        &self,
        state: &SessionState,
        payload: &Value,
        generated_at: DateTime<Utc>,
    ) -> Aggregation {
        let stamp = generated_at.timestamp_millis();

        let warnings: Vec<RiskWarning> = entries(payload.get("psychological_risks"))
            .iter()
            .enumerate()
            .map(|(i, entry)| RiskWarning::from_entry(format!("WARN-{}-{}", stamp, i), entry))
            .collect();

        let barrier_count = entries(payload.get("communication_barriers"))
            .iter()
            .filter(|b| b.get("present").and_then(Value::as_bool).unwrap_or(false))
            .count();

        let intensity_index = payload
            .get("emotion_intensity_index")
            .and_then(Value::as_f64)
            .map(|v| (v * 10.0).round() / 10.0)
            .unwrap_or(0.0);

        let report = ComprehensiveReport {
            id: format!("RPT-{}", stamp),
            generated_at,
            backend_timestamp: payload
                .get("timestamp")
                .and_then(Value::as_str)
                .unwrap_or("N/A")
                .to_string(),
            intensity_index,
            risk_level: overall_risk_level(warnings.iter().map(|w| &w.level)),
            communication: CommunicationAssessment::from_barrier_count(barrier_count),
            recommendations: recommendations(payload.get("interventions")),
            radar: payload.get("radar_chart").and_then(RadarProfile::from_value),
            emotion_distribution: state.emotion_distribution().clone(),
            intensity: state.intensity(),
            modalities: state.modalities(),
            payload: payload.clone(),
        };

        info!(
            "Aggregated report {}: risk={}, {} warnings, {} recommendations, communication={}",
            report.id,
            report.risk_level.as_str(),
            warnings.len(),
            report.recommendations.len(),
            report.communication.as_str()
        );

        Aggregation { report, warnings }
    }
}

fn entries(value: Option<&Value>) -> &[Value] {
    value.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

/// Immediate block, then short-term, then long-term; bucket order preserved
fn recommendations(interventions: Option<&Value>) -> Vec<Recommendation> {
    let Some(interventions) = interventions else {
        return Vec::new();
    };

    [
        ("immediate", Priority::High),
        ("short_term", Priority::Medium),
        ("long_term", Priority::Low),
    ]
    .into_iter()
    .flat_map(|(bucket, priority)| {
        entries(interventions.get(bucket))
            .iter()
            .map(move |item| (priority, item))
    })
    .enumerate()
    .map(|(i, (priority, item))| {
        let content = match item {
            Value::String(text) => text.clone(),
            other => other
                .get("action")
                .and_then(Value::as_str)
                .unwrap_or("N/A")
                .to_string(),
        };
        Recommendation {
            id: format!("REC-{}", i),
            priority,
            content,
            risk_type: item.get("type").and_then(Value::as_str).map(str::to_string),
        }
    })
    .collect()
}
