mod aggregator;
mod risk;

pub use aggregator::{
    Aggregation, CommunicationAssessment, ComprehensiveReport, Priority, RadarProfile,
    Recommendation, ReportAggregator,
};
pub use risk::{overall_risk_level, RiskLevel, RiskType, RiskWarning};
