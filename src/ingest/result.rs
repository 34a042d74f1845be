use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CaptureError;

/// One analysis input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Face,
    Voice,
    Text,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Face => "face",
            Modality::Voice => "voice",
            Modality::Text => "text",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "face" | "video" => Ok(Modality::Face),
            "voice" | "audio" => Ok(Modality::Voice),
            "text" => Ok(Modality::Text),
            other => Err(CaptureError::malformed(format!("unknown modality '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaceResult {
    pub emotions: Option<BTreeMap<String, f64>>,
    pub intensity: Option<f64>,
    pub micro_expressions: BTreeMap<String, f64>,
    pub face_detected: Option<bool>,
    pub key_moments: Vec<Value>,
    pub raw: Value,
}

/// Prosody descriptor (pitch, volume or speed) reported for a voice sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProsodyDescriptor {
    /// "high"/"low", "loud"/"quiet", "fast"/"slow"...
    pub kind: Option<String>,
    pub intensity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoiceResult {
    pub emotions: Option<BTreeMap<String, f64>>,
    pub intensity: Option<f64>,
    pub pitch: Option<ProsodyDescriptor>,
    pub volume: Option<ProsodyDescriptor>,
    pub speed: Option<ProsodyDescriptor>,
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextResult {
    pub semantic_analysis: Value,
    pub keywords: Vec<Value>,
    pub emotion_vector: Option<Vec<f64>>,
    pub raw: Value,
}

/// A per-modality analysis result, decoded defensively.
///
/// Missing or wrong-typed fields come out as `None`/empty instead of
/// failing the whole payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalityResult {
    Face(FaceResult),
    Voice(VoiceResult),
    Text(TextResult),
}

impl ModalityResult {
    pub fn decode(modality: Modality, data: &Value) -> Self {
        let empty = Map::new();
        let obj = data.as_object().unwrap_or(&empty);

        match modality {
            Modality::Face => ModalityResult::Face(FaceResult {
                emotions: score_map(obj.get("emotions")),
                intensity: number(obj.get("intensity")),
                micro_expressions: score_map(obj.get("micro_expressions")).unwrap_or_default(),
                face_detected: obj.get("face_detected").and_then(Value::as_bool),
                key_moments: obj
                    .get("key_moments")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
                raw: data.clone(),
            }),
            Modality::Voice => ModalityResult::Voice(VoiceResult {
                emotions: score_map(obj.get("emotion")).or_else(|| score_map(obj.get("emotions"))),
                intensity: number(obj.get("intensity")),
                pitch: descriptor(obj.get("pitch"), "type"),
                volume: descriptor(obj.get("volume"), "level"),
                speed: descriptor(obj.get("speed"), "type"),
                raw: data.clone(),
            }),
            Modality::Text => ModalityResult::Text(TextResult {
                semantic_analysis: obj.get("semantic_analysis").cloned().unwrap_or(Value::Null),
                keywords: obj
                    .get("keywords")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
                emotion_vector: obj.get("emotion_vector").and_then(Value::as_array).map(|items| {
                    items.iter().filter_map(Value::as_f64).collect()
                }),
                raw: data.clone(),
            }),
        }
    }

    /// Decode a `{modality, result}` pair as delivered by a notification
    pub fn from_notification(modality: &str, data: &Value) -> Result<Self, CaptureError> {
        Ok(Self::decode(modality.parse()?, data))
    }

    pub fn modality(&self) -> Modality {
        match self {
            ModalityResult::Face(_) => Modality::Face,
            ModalityResult::Voice(_) => Modality::Voice,
            ModalityResult::Text(_) => Modality::Text,
        }
    }

    /// Raw label→score map; text results never carry one
    pub fn emotion_scores(&self) -> Option<&BTreeMap<String, f64>> {
        match self {
            ModalityResult::Face(face) => face.emotions.as_ref(),
            ModalityResult::Voice(voice) => voice.emotions.as_ref(),
            ModalityResult::Text(_) => None,
        }
    }

    pub fn intensity(&self) -> Option<f64> {
        match self {
            ModalityResult::Face(face) => face.intensity,
            ModalityResult::Voice(voice) => voice.intensity,
            ModalityResult::Text(_) => None,
        }
    }

    pub fn raw(&self) -> &Value {
        match self {
            ModalityResult::Face(face) => &face.raw,
            ModalityResult::Voice(voice) => &voice.raw,
            ModalityResult::Text(text) => &text.raw,
        }
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn score_map(value: Option<&Value>) -> Option<BTreeMap<String, f64>> {
    let obj = value?.as_object()?;
    Some(
        obj.iter()
            .filter_map(|(label, score)| number(Some(score)).map(|s| (label.clone(), s)))
            .collect(),
    )
}

fn descriptor(value: Option<&Value>, kind_field: &str) -> Option<ProsodyDescriptor> {
    let obj = value?.as_object()?;
    Some(ProsodyDescriptor {
        kind: obj.get(kind_field).and_then(Value::as_str).map(str::to_string),
        intensity: number(obj.get("intensity")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_face_decode() {
        let data = json!({
            "emotions": {"happy": 0.7, "fearful": 0.1, "bogus": "n/a"},
            "intensity": 64.2,
            "micro_expressions": {"lip_tension": 0.3},
            "face_detected": true
        });

        let result = ModalityResult::decode(Modality::Face, &data);
        let scores = result.emotion_scores().unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(result.intensity(), Some(64.2));
        assert_eq!(result.raw(), &data);

        let ModalityResult::Face(face) = result else {
            panic!("expected face result");
        };
        assert_eq!(face.face_detected, Some(true));
        assert_eq!(face.micro_expressions["lip_tension"], 0.3);
    }

    #[test]
    fn test_voice_uses_emotion_field() {
        let data = json!({
            "emotion": {"calm": 0.5, "surprised": 0.5},
            "intensity": 40,
            "pitch": {"type": "high", "intensity": 0.8},
            "volume": {"level": "loud"}
        });

        let result = ModalityResult::decode(Modality::Voice, &data);
        assert_eq!(result.emotion_scores().unwrap().len(), 2);
        assert_eq!(result.intensity(), Some(40.0));

        let ModalityResult::Voice(voice) = result else {
            panic!("expected voice result");
        };
        assert_eq!(voice.pitch.unwrap().kind.as_deref(), Some("high"));
        assert_eq!(voice.volume.unwrap().intensity, None);
        assert!(voice.speed.is_none());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let result = ModalityResult::decode(Modality::Face, &json!({"intensity": "high"}));
        assert!(result.emotion_scores().is_none());
        assert!(result.intensity().is_none());

        let result = ModalityResult::decode(Modality::Text, &json!(null));
        let ModalityResult::Text(text) = result else {
            panic!("expected text result");
        };
        assert_eq!(text.semantic_analysis, Value::Null);
        assert!(text.keywords.is_empty());
        assert!(text.emotion_vector.is_none());
    }

    #[test]
    fn test_text_never_carries_scores() {
        let data = json!({"emotions": {"happy": 1.0}, "semantic_analysis": {"overall": "positive"}});
        let result = ModalityResult::decode(Modality::Text, &data);
        assert!(result.emotion_scores().is_none());
    }

    #[test]
    fn test_unknown_modality_is_malformed() {
        let err = ModalityResult::from_notification("gesture", &json!({})).unwrap_err();
        assert!(matches!(err, CaptureError::MalformedResult(_)));
        assert_eq!("Audio".parse::<Modality>().unwrap(), Modality::Voice);
    }
}
