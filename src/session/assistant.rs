//! Keyword responder for the dashboard assistant panel

use super::snapshot::VisualizationSnapshot;

const GUIDANCE: &str = "Based on the current analysis: 1) keep up regular mental health \
assessments; 2) step in promptly when emotions fluctuate strongly; 3) make support \
resources available.";

const USAGE: &str = "To use the dashboard: 1) capture face, voice or text on the live \
analysis page; 2) results are analyzed and shown automatically; 3) check the dashboard \
for the overall state; 4) generate a comprehensive report for recommendations.";

const FALLBACK: &str = "Could you give more detail? You can ask about emotional \
intensity, risk warnings or recommended interventions.";

fn mentions(query: &str, words: &[&str]) -> bool {
    words.iter().any(|word| query.contains(word))
}

/// Answer a free-form question from the current snapshot
pub fn respond(snapshot: &VisualizationSnapshot, query: &str) -> String {
    let query = query.to_lowercase();

    if mentions(&query, &["intensity", "emotion"]) {
        format!(
            "The current emotional intensity index is {:.0}, status: {}.",
            snapshot.intensity.value(),
            snapshot.intensity.status()
        )
    } else if mentions(&query, &["risk", "warning"]) {
        let top = snapshot
            .risk_warnings
            .first()
            .map(|w| w.label.as_str())
            .unwrap_or("no risk");
        format!(
            "{} risk warning(s) detected. Most in need of attention: {}.",
            snapshot.risk_warnings.len(),
            top
        )
    } else if mentions(&query, &["recommend", "intervention", "suggest"]) {
        GUIDANCE.to_string()
    } else if mentions(&query, &["usage", "help", "how do i", "how to"]) {
        USAGE.to_string()
    } else {
        FALLBACK.to_string()
    }
}
