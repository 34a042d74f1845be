use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::payload::{ApiEnvelope, EvaluationRequest};
use crate::error::CaptureError;

const FACE_ENDPOINT: &str = "/api/analyze/face";
const VOICE_ENDPOINT: &str = "/api/analyze/voice";
const TEXT_ENDPOINT: &str = "/api/analyze/text";
const EVALUATE_ENDPOINT: &str = "/api/evaluate/comprehensive";

/// Remote analysis service. Returns the `data` object of successful responses.
#[async_trait::async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Analyze one JPEG frame given as a data URL
    async fn analyze_face(&self, image: &str) -> Result<Value, CaptureError>;

    /// Analyze a WAV recording
    async fn analyze_voice(&self, wav: Vec<u8>) -> Result<Value, CaptureError>;

    async fn analyze_text(&self, text: &str) -> Result<Value, CaptureError>;

    /// Comprehensive evaluation over whatever modalities were captured
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Value, CaptureError>;
}

/// HTTP client for the analysis backend.
///
/// No request timeout is set: a stalled backend leaves the caller waiting
/// and session state untouched.
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnalysisClient {
    pub fn new(base_url: &str) -> Result<Self, CaptureError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| CaptureError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Value, CaptureError> {
        let response = self.client.post(self.url(endpoint)).json(body).send().await?;
        Self::read_envelope(endpoint, response).await
    }

    async fn read_envelope(endpoint: &str, response: reqwest::Response) -> Result<Value, CaptureError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let truncated: String = body.chars().take(200).collect();
            return Err(CaptureError::transport(format!(
                "{} returned {}: {}",
                endpoint, status, truncated
            )));
        }

        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| CaptureError::transport(format!("Failed to parse {} response: {}", endpoint, e)))?;

        debug!("{} responded with status '{}'", endpoint, envelope.status);
        envelope.into_data()
    }
}

#[async_trait::async_trait]
impl AnalysisBackend for HttpAnalysisClient {
    async fn analyze_face(&self, image: &str) -> Result<Value, CaptureError> {
        debug!("Face analysis request ({} bytes)", image.len());
        self.post_json(FACE_ENDPOINT, &json!({ "image": image })).await
    }

    async fn analyze_voice(&self, wav: Vec<u8>) -> Result<Value, CaptureError> {
        info!("Voice analysis request ({} bytes)", wav.len());

        let part = reqwest::multipart::Part::bytes(wav)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .map_err(|e| CaptureError::transport(format!("Failed to create file part: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("audio", part);

        let response = self
            .client
            .post(self.url(VOICE_ENDPOINT))
            .multipart(form)
            .send()
            .await?;
        Self::read_envelope(VOICE_ENDPOINT, response).await
    }

    async fn analyze_text(&self, text: &str) -> Result<Value, CaptureError> {
        info!("Text analysis request ({} chars)", text.chars().count());
        self.post_json(TEXT_ENDPOINT, &json!({ "text": text })).await
    }

    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Value, CaptureError> {
        info!(
            "Comprehensive evaluation request (face={}, voice={}, text={})",
            request.face_data.is_some(),
            request.voice_data.is_some(),
            request.text_data.is_some()
        );
        self.post_json(EVALUATE_ENDPOINT, request).await
    }
}
