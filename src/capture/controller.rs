use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::backend::{AudioBackend, FrameReceiver, VideoBackend, VideoFrame};
use super::recording::{AudioBlob, RecordingSession};
use crate::error::CaptureError;

/// Lifecycle of one device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
    Inactive,
    Acquiring,
    Active,
}

/// Handle given to the streaming loop for an active video stream
#[derive(Clone)]
pub struct VideoStream {
    pub frames: FrameReceiver,
    /// Cancelled as soon as video stops
    pub token: CancellationToken,
}

struct ActiveVideo {
    frames: FrameReceiver,
    token: CancellationToken,
}

/// Owns the camera stream and the audio recording session.
///
/// This is the only component that talks to devices.
pub struct CaptureController {
    video_backend: Box<dyn VideoBackend>,
    audio_backend: Box<dyn AudioBackend>,
    video_state: DeviceState,
    audio_state: DeviceState,
    video: Option<ActiveVideo>,
    recording: Option<RecordingSession>,
}

impl CaptureController {
    pub fn new(video_backend: Box<dyn VideoBackend>, audio_backend: Box<dyn AudioBackend>) -> Self {
        Self {
            video_backend,
            audio_backend,
            video_state: DeviceState::Inactive,
            audio_state: DeviceState::Inactive,
            video: None,
            recording: None,
        }
    }

    pub fn video_state(&self) -> DeviceState {
        self.video_state
    }

    pub fn audio_state(&self) -> DeviceState {
        self.audio_state
    }

    /// Current (or last sealed) recording, if any
    pub fn recording(&self) -> Option<&RecordingSession> {
        self.recording.as_ref()
    }

    /// Token the streaming loop polls; `None` while video is inactive
    pub fn video_token(&self) -> Option<CancellationToken> {
        self.video.as_ref().map(|v| v.token.clone())
    }

    /// Most recent frame of the active video stream
    pub fn latest_frame(&self) -> Option<VideoFrame> {
        self.video.as_ref().and_then(|v| v.frames.borrow().clone())
    }

    /// Acquire the camera. On failure the state falls back to Inactive.
    pub async fn start_video(&mut self) -> Result<VideoStream, CaptureError> {
        if let Some(video) = &self.video {
            warn!("Video already active");
            return Ok(VideoStream {
                frames: video.frames.clone(),
                token: video.token.clone(),
            });
        }

        info!("Acquiring video device: {}", self.video_backend.name());
        self.video_state = DeviceState::Acquiring;

        let frames = match self.video_backend.start().await {
            Ok(frames) => frames,
            Err(e) => {
                warn!("Video acquisition failed: {}", e);
                self.video_state = DeviceState::Inactive;
                return Err(e);
            }
        };

        let token = CancellationToken::new();
        self.video = Some(ActiveVideo {
            frames: frames.clone(),
            token: token.clone(),
        });
        self.video_state = DeviceState::Active;
        info!("Video capture active");

        Ok(VideoStream { frames, token })
    }

    /// Release the camera. No-op when already inactive.
    pub async fn stop_video(&mut self) {
        let Some(video) = self.video.take() else {
            return;
        };

        // Streaming loop observes this at the top of its next cycle
        video.token.cancel();

        if let Err(e) = self.video_backend.stop().await {
            error!("Failed to release video device: {}", e);
        }
        self.video_state = DeviceState::Inactive;
        info!("Video capture stopped");
    }

    /// Acquire the microphone and open a new recording session,
    /// discarding the previous sealed one.
    pub async fn start_audio(&mut self) -> Result<(), CaptureError> {
        if self.audio_state == DeviceState::Active {
            warn!("Recording already started");
            return Ok(());
        }

        info!("Acquiring audio device: {}", self.audio_backend.name());
        self.audio_state = DeviceState::Acquiring;

        let capture = match self.audio_backend.start().await {
            Ok(capture) => capture,
            Err(e) => {
                warn!("Audio acquisition failed: {}", e);
                self.audio_state = DeviceState::Inactive;
                return Err(e);
            }
        };

        self.recording = Some(RecordingSession::start(capture.chunks, capture.format));
        self.audio_state = DeviceState::Active;

        Ok(())
    }

    /// Release the microphone and seal the recording.
    ///
    /// Returns the blob on the first call after a start, `None` afterwards.
    pub async fn stop_audio(&mut self) -> Option<AudioBlob> {
        if self.audio_state != DeviceState::Active {
            return None;
        }

        if let Err(e) = self.audio_backend.stop().await {
            error!("Failed to release audio device: {}", e);
        }
        self.audio_state = DeviceState::Inactive;

        match self.recording.as_mut() {
            Some(recording) => recording.seal().await,
            None => None,
        }
    }

    /// Release every device; used on shutdown
    pub async fn shutdown(&mut self) {
        self.stop_video().await;
        self.stop_audio().await;
    }
}
