// Test doubles shared by the integration tests
#![allow(dead_code)]

use affect_orchestrator::analysis::{AnalysisBackend, EvaluationRequest};
use affect_orchestrator::capture::{
    AudioBackend, AudioCapture, AudioChunk, AudioFormat, CaptureController, FrameReceiver,
    VideoBackend, VideoFrame,
};
use affect_orchestrator::error::CaptureError;
use affect_orchestrator::nats::FrameMessage;
use affect_orchestrator::streaming::FrameTransport;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

pub fn test_frame() -> VideoFrame {
    VideoFrame {
        rgb: vec![128u8; 4 * 4 * 3],
        width: 4,
        height: 4,
        timestamp_ms: 0,
    }
}

/// Camera that serves one fixed frame, or refuses to start
pub struct MockCamera {
    available: bool,
    sender: Option<watch::Sender<Option<VideoFrame>>>,
}

impl MockCamera {
    pub fn new() -> Self {
        Self {
            available: true,
            sender: None,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            sender: None,
        }
    }
}

#[async_trait::async_trait]
impl VideoBackend for MockCamera {
    async fn start(&mut self) -> Result<FrameReceiver, CaptureError> {
        if !self.available {
            return Err(CaptureError::device("Permission denied"));
        }
        let (tx, rx) = watch::channel(Some(test_frame()));
        self.sender = Some(tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.sender = None;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.sender.is_some()
    }

    fn name(&self) -> &str {
        "mock-camera"
    }
}

/// Microphone that delivers a fixed set of chunks right after start
pub struct MockMicrophone {
    available: bool,
    chunks: Vec<Vec<u8>>,
    sender: Option<mpsc::Sender<AudioChunk>>,
}

impl MockMicrophone {
    pub fn with_chunks(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            available: true,
            chunks,
            sender: None,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            chunks: Vec::new(),
            sender: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for MockMicrophone {
    async fn start(&mut self) -> Result<AudioCapture, CaptureError> {
        if !self.available {
            return Err(CaptureError::device("No microphone"));
        }
        let (tx, rx) = mpsc::channel(self.chunks.len().max(1));
        for (i, bytes) in self.chunks.iter().enumerate() {
            tx.try_send(AudioChunk {
                bytes: bytes.clone(),
                timestamp_ms: i as u64 * 100,
            })
            .map_err(|e| CaptureError::device(e.to_string()))?;
        }
        self.sender = Some(tx);
        Ok(AudioCapture {
            chunks: rx,
            format: AudioFormat::default(),
        })
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.sender = None;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.sender.is_some()
    }

    fn name(&self) -> &str {
        "mock-microphone"
    }
}

pub fn mock_controller() -> CaptureController {
    CaptureController::new(
        Box::new(MockCamera::new()),
        Box::new(MockMicrophone::with_chunks(vec![vec![1, 0, 2, 0], vec![3, 0, 4, 0]])),
    )
}

/// Frame transport that counts submissions, optionally taking its time
pub struct CountingTransport {
    pub submitted: AtomicUsize,
    pub completed: AtomicUsize,
    delay: Duration,
}

impl CountingTransport {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            submitted: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            delay,
        })
    }

    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl FrameTransport for CountingTransport {
    async fn submit(&self, frame: FrameMessage) -> Result<(), CaptureError> {
        assert!(frame.frame.starts_with("data:image/jpeg;base64,"));
        self.submitted.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Analysis backend returning canned payloads and recording each call
pub struct MockAnalysis {
    pub face: Value,
    pub voice: Value,
    pub text: Value,
    pub evaluation: Value,
    pub fail: bool,
    /// Simulated round trip of the face endpoint
    pub face_delay: Duration,
    pub calls: Mutex<Vec<String>>,
    pub requests: Mutex<Vec<EvaluationRequest>>,
}

impl MockAnalysis {
    pub fn new() -> Self {
        Self {
            face: json!({
                "emotions": {"happy": 0.6, "sad": 0.1, "neutral": 0.3},
                "intensity": 45.0,
                "face_detected": true
            }),
            voice: json!({
                "emotion": {"angry": 0.5, "calm": 0.5},
                "intensity": 85.0,
                "pitch": {"type": "high", "intensity": 0.8}
            }),
            text: json!({
                "semantic_analysis": {"sentiment": "negative"},
                "keywords": ["tired", "alone"],
                "emotion_vector": [0.1, 0.7]
            }),
            evaluation: json!({
                "timestamp": "2026-01-01T00:00:00",
                "emotion_intensity_index": 62.34,
                "psychological_risks": [
                    {"type": "anxiety", "level": "high", "description": "Elevated anxiety"}
                ],
                "communication_barriers": [{"type": "avoidance", "present": true}],
                "interventions": {"immediate": [{"action": "Check in today"}]}
            }),
            fail: false,
            face_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn with_face_delay(face_delay: Duration) -> Self {
        Self {
            face_delay,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: &str, value: &Value) -> Result<Value, CaptureError> {
        self.calls.lock().unwrap().push(call.to_string());
        if self.fail {
            return Err(CaptureError::transport("backend returned 500"));
        }
        Ok(value.clone())
    }
}

#[async_trait::async_trait]
impl AnalysisBackend for MockAnalysis {
    async fn analyze_face(&self, image: &str) -> Result<Value, CaptureError> {
        assert!(image.starts_with("data:image/jpeg;base64,"));
        if !self.face_delay.is_zero() {
            tokio::time::sleep(self.face_delay).await;
        }
        self.answer("face", &self.face)
    }

    async fn analyze_voice(&self, wav: Vec<u8>) -> Result<Value, CaptureError> {
        assert_eq!(&wav[0..4], b"RIFF");
        self.answer("voice", &self.voice)
    }

    async fn analyze_text(&self, _text: &str) -> Result<Value, CaptureError> {
        self.answer("text", &self.text)
    }

    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Value, CaptureError> {
        self.requests.lock().unwrap().push(request.clone());
        self.answer("evaluate", &self.evaluation)
    }
}
