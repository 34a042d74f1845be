use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::CaptureError;
use crate::ingest::{Modality, ModalityResult};
use crate::session::SessionState;

/// Response wrapper used by every analysis endpoint
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiEnvelope {
    /// `data` of a successful response; missing data counts as an empty object
    pub fn into_data(self) -> Result<Value, CaptureError> {
        if self.status == "success" {
            Ok(self.data.unwrap_or_else(|| json!({})))
        } else {
            Err(CaptureError::transport(format!(
                "Backend returned status '{}': {}",
                self.status,
                self.message.as_deref().unwrap_or("no message")
            )))
        }
    }
}

/// Body of the comprehensive evaluation request. Each modality is null when
/// it was never captured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRequest {
    pub face_data: Option<Value>,
    pub voice_data: Option<Value>,
    pub text_data: Option<Value>,
}

impl EvaluationRequest {
    pub fn from_state(state: &SessionState) -> Self {
        let face_data = state.latest(Modality::Face).map(|face| {
            json!({
                "intensity": state.intensity().value(),
                "data": face.raw(),
            })
        });

        let voice_data = state.latest(Modality::Voice).map(|voice| {
            json!({
                "intensity": voice.intensity(),
                "data": voice.raw(),
            })
        });

        let text_data = state.latest(Modality::Text).map(|text| match text {
            ModalityResult::Text(text) => {
                let mut data = json!({ "semantic_analysis": text.semantic_analysis });
                if let Some(vector) = &text.emotion_vector {
                    data["emotion_vector"] = json!(vector);
                }
                json!({ "data": data })
            }
            other => json!({ "data": other.raw() }),
        });

        Self {
            face_data,
            voice_data,
            text_data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.face_data.is_none() && self.voice_data.is_none() && self.text_data.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_without_data() {
        let envelope: ApiEnvelope = serde_json::from_value(json!({"status": "success"})).unwrap();
        assert_eq!(envelope.into_data().unwrap(), json!({}));
    }

    #[test]
    fn test_envelope_error_is_transport_failure() {
        let envelope: ApiEnvelope =
            serde_json::from_value(json!({"status": "error", "message": "no face"})).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert!(matches!(err, CaptureError::TransportFailure(ref m) if m.contains("no face")));
    }

    #[test]
    fn test_request_for_empty_state_is_all_null() {
        let request = EvaluationRequest::from_state(&SessionState::new("s"));
        assert!(request.is_empty());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"face_data": null, "voice_data": null, "text_data": null})
        );
    }
}
