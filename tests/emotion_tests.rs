// Tests for the emotion vocabulary and intensity classification

use affect_orchestrator::emotion::{
    canonicalize, clamp_intensity, classify, CanonicalEmotion, EmotionKey, IntensityBand,
    IntensityState,
};

#[test]
fn test_canonical_keys_are_fixed_points() {
    for emotion in CanonicalEmotion::ALL {
        let key = canonicalize(emotion.as_str());
        assert_eq!(key, EmotionKey::Canonical(emotion));
        assert_eq!(canonicalize(key.as_str()), key, "canonicalize should be idempotent");
    }
}

#[test]
fn test_modality_labels_map_onto_vocabulary() {
    assert_eq!(canonicalize("face_happy").canonical(), Some(CanonicalEmotion::Happy));
    assert_eq!(canonicalize("Sadness").canonical(), Some(CanonicalEmotion::Sad));
    assert_eq!(canonicalize("joy").canonical(), Some(CanonicalEmotion::Happy));
    assert_eq!(canonicalize("disgust").canonical(), None);
}

#[test]
fn test_band_boundaries() {
    assert_eq!(classify(0.0).band, IntensityBand::Low);
    assert_eq!(classify(29.99).band, IntensityBand::Low);
    assert_eq!(classify(30.0).band, IntensityBand::Medium);
    assert_eq!(classify(69.99).band, IntensityBand::Medium);
    assert_eq!(classify(70.0).band, IntensityBand::High);
    assert_eq!(classify(100.0).band, IntensityBand::High);
}

#[test]
fn test_status_text_follows_band() {
    assert_eq!(classify(10.0).status, "stable");
    assert_eq!(classify(50.0).status, "moderate fluctuation");
    assert_eq!(classify(90.0).status, "severe fluctuation");
}

#[test]
fn test_out_of_range_values_are_clamped() {
    assert_eq!(clamp_intensity(-5.0), 0.0);
    assert_eq!(clamp_intensity(250.0), 100.0);
    assert_eq!(clamp_intensity(f64::NAN), 0.0);
    assert_eq!(classify(250.0).band, IntensityBand::High);
}

#[test]
fn test_intensity_state_serializes_band_and_status() {
    let state = IntensityState::from_value(45.0);
    let json = serde_json::to_value(state).unwrap();

    assert_eq!(json["value"], 45.0);
    assert_eq!(json["band"], "medium");
    assert_eq!(json["status"], "moderate fluctuation");
}
