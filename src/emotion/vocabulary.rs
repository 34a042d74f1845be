use serde::{Deserialize, Serialize};
use std::fmt;

/// Modality prefixes some backends put in front of emotion labels
const MODALITY_PREFIXES: [&str; 3] = ["face_", "voice_", "text_"];

/// The fixed set of emotions used for cross-modality comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalEmotion {
    Happy,
    Sad,
    Angry,
    Fear,
    Surprise,
    Neutral,
}

impl CanonicalEmotion {
    pub const ALL: [CanonicalEmotion; 6] = [
        CanonicalEmotion::Happy,
        CanonicalEmotion::Sad,
        CanonicalEmotion::Angry,
        CanonicalEmotion::Fear,
        CanonicalEmotion::Surprise,
        CanonicalEmotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalEmotion::Happy => "happy",
            CanonicalEmotion::Sad => "sad",
            CanonicalEmotion::Angry => "angry",
            CanonicalEmotion::Fear => "fear",
            CanonicalEmotion::Surprise => "surprise",
            CanonicalEmotion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for CanonicalEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of canonicalizing a backend label.
///
/// Labels outside the synonym table are kept as their own key so that new
/// backend categories flow through instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EmotionKey {
    Canonical(CanonicalEmotion),
    Other(String),
}

impl EmotionKey {
    pub fn as_str(&self) -> &str {
        match self {
            EmotionKey::Canonical(emotion) => emotion.as_str(),
            EmotionKey::Other(label) => label,
        }
    }

    pub fn canonical(&self) -> Option<CanonicalEmotion> {
        match self {
            EmotionKey::Canonical(emotion) => Some(*emotion),
            EmotionKey::Other(_) => None,
        }
    }
}

impl fmt::Display for EmotionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a modality-specific label onto the canonical vocabulary
pub fn canonicalize(raw_label: &str) -> EmotionKey {
    let lowered = raw_label.trim().to_lowercase();
    let key = MODALITY_PREFIXES
        .iter()
        .find_map(|prefix| lowered.strip_prefix(prefix))
        .unwrap_or(&lowered);

    match lookup(key) {
        Some(emotion) => EmotionKey::Canonical(emotion),
        None => EmotionKey::Other(key.to_string()),
    }
}

fn lookup(key: &str) -> Option<CanonicalEmotion> {
    let emotion = match key {
        "happy" | "happiness" | "joy" => CanonicalEmotion::Happy,
        "sad" | "sadness" => CanonicalEmotion::Sad,
        "angry" | "anger" => CanonicalEmotion::Angry,
        "fear" | "fearful" | "scared" => CanonicalEmotion::Fear,
        "surprise" | "surprised" => CanonicalEmotion::Surprise,
        "neutral" | "calm" => CanonicalEmotion::Neutral,
        _ => return None,
    };
    Some(emotion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_map_to_canonical_keys() {
        assert_eq!(canonicalize("fearful"), EmotionKey::Canonical(CanonicalEmotion::Fear));
        assert_eq!(canonicalize("surprised"), EmotionKey::Canonical(CanonicalEmotion::Surprise));
        assert_eq!(canonicalize("calm"), EmotionKey::Canonical(CanonicalEmotion::Neutral));
    }

    #[test]
    fn test_prefix_and_case_are_stripped() {
        assert_eq!(canonicalize("face_Happy"), EmotionKey::Canonical(CanonicalEmotion::Happy));
        assert_eq!(canonicalize("FACE_SAD"), EmotionKey::Canonical(CanonicalEmotion::Sad));
        assert_eq!(canonicalize("  Angry "), EmotionKey::Canonical(CanonicalEmotion::Angry));
    }

    #[test]
    fn test_unknown_labels_pass_through() {
        assert_eq!(canonicalize("disgust"), EmotionKey::Other("disgust".to_string()));
        assert_eq!(canonicalize("face_Contempt").as_str(), "contempt");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for label in ["face_fearful", "calm", "Surprised", "disgust", "happy", "voice_sadness"] {
            let once = canonicalize(label);
            let twice = canonicalize(once.as_str());
            assert_eq!(once, twice, "label {label} should be stable");
        }
        for emotion in CanonicalEmotion::ALL {
            assert_eq!(canonicalize(emotion.as_str()), EmotionKey::Canonical(emotion));
        }
    }
}
