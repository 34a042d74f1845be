// Tests for folding analysis results into session state

use affect_orchestrator::emotion::{CanonicalEmotion, IntensityBand};
use affect_orchestrator::ingest::{Modality, ModalityResult, ResultIngestor};
use affect_orchestrator::session::SessionState;
use serde_json::json;

fn face(data: serde_json::Value) -> ModalityResult {
    ModalityResult::decode(Modality::Face, &data)
}

#[test]
fn test_intensity_follows_the_latest_result() {
    let ingestor = ResultIngestor::new();
    let mut state = SessionState::new("test-session");

    for value in [20.0, 45.0, 85.0] {
        ingestor.ingest(&mut state, face(json!({ "intensity": value })));
    }

    let intensity = state.intensity();
    assert_eq!(intensity.value(), 85.0);
    assert_eq!(intensity.band(), IntensityBand::High);
    assert_eq!(intensity.status(), "severe fluctuation");
}

#[test]
fn test_result_without_scores_keeps_distribution() {
    let ingestor = ResultIngestor::new();
    let mut state = SessionState::new("test-session");

    let outcome = ingestor.ingest(
        &mut state,
        face(json!({ "emotions": {"face_happy": 0.7, "face_sad": 0.2}, "intensity": 30 })),
    );
    assert_eq!(outcome.emotions_updated, 2);

    let before = state.emotion_distribution().clone();
    let outcome = ingestor.ingest(&mut state, face(json!({ "intensity": 10 })));

    assert_eq!(outcome.emotions_updated, 0);
    assert_eq!(state.emotion_distribution(), &before);
    assert_eq!(state.emotion_distribution().get(CanonicalEmotion::Happy), 70);
    assert_eq!(state.intensity().band(), IntensityBand::Low);
}

#[test]
fn test_scores_overwrite_only_reported_keys() {
    let ingestor = ResultIngestor::new();
    let mut state = SessionState::new("test-session");

    ingestor.ingest(&mut state, face(json!({ "emotions": {"happy": 0.5, "fear": 0.4} })));
    ingestor.ingest(
        &mut state,
        ModalityResult::decode(Modality::Voice, &json!({ "emotion": {"fearful": 0.1, "disgust": 0.9} })),
    );

    let distribution = state.emotion_distribution();
    assert_eq!(distribution.get(CanonicalEmotion::Happy), 50);
    assert_eq!(distribution.get(CanonicalEmotion::Fear), 10);
    assert_eq!(distribution.iter().count(), 2, "non-canonical labels are not stored");
}

#[test]
fn test_text_result_is_stored_without_touching_scores() {
    let ingestor = ResultIngestor::new();
    let mut state = SessionState::new("test-session");

    ingestor.ingest(&mut state, face(json!({ "emotions": {"neutral": 1.0}, "intensity": 50 })));
    let outcome = ingestor.ingest(
        &mut state,
        ModalityResult::decode(Modality::Text, &json!({ "keywords": ["tired"] })),
    );

    assert_eq!(outcome.modality, Modality::Text);
    assert!(outcome.intensity.is_none());
    assert_eq!(state.intensity().value(), 50.0);
    assert_eq!(state.emotion_distribution().get(CanonicalEmotion::Neutral), 100);
    assert_eq!(state.modalities(), vec![Modality::Face, Modality::Text]);
}

#[test]
fn test_malformed_payload_decodes_to_empty_result() {
    let result = ModalityResult::decode(Modality::Face, &json!("not an object"));

    assert!(result.emotion_scores().is_none());
    assert!(result.intensity().is_none());
}

#[test]
fn test_unknown_notification_modality_is_rejected() {
    let err = ModalityResult::from_notification("gesture", &json!({})).unwrap_err();
    assert!(matches!(err, affect_orchestrator::CaptureError::MalformedResult(_)));

    let result = ModalityResult::from_notification("audio", &json!({})).unwrap();
    assert_eq!(result.modality(), Modality::Voice);
}
