use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

use super::file::{ImageDirectoryCamera, WavMicrophone};
use crate::error::CaptureError;

/// One decoded video frame (packed RGB8)
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// Raw pixels, 3 bytes per pixel, row-major
    pub rgb: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Milliseconds since capture started
    pub timestamp_ms: u64,
}

/// A piece of recorded audio as delivered by the device (16-bit LE PCM)
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    pub bytes: Vec<u8>,
    /// Milliseconds since capture started
    pub timestamp_ms: u64,
}

/// PCM layout of the chunks produced by an audio device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
        }
    }
}

/// Live audio stream handed out by an audio device
pub struct AudioCapture {
    pub chunks: mpsc::Receiver<AudioChunk>,
    pub format: AudioFormat,
}

/// Latest-frame channel handed out by a video device
pub type FrameReceiver = watch::Receiver<Option<VideoFrame>>;

/// Video capture device
///
/// Implementations:
/// - `ImageDirectoryCamera`: replays still images from a directory
/// - test doubles in the integration tests
#[async_trait::async_trait]
pub trait VideoBackend: Send + Sync {
    /// Acquire the device. The receiver always holds the most recent frame.
    async fn start(&mut self) -> Result<FrameReceiver, CaptureError>;

    /// Release every track of the active stream
    async fn stop(&mut self) -> Result<(), CaptureError>;

    fn is_capturing(&self) -> bool;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Audio capture device
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Acquire the device; chunks arrive in recording order
    async fn start(&mut self) -> Result<AudioCapture, CaptureError>;

    /// Release the audio tracks. Pending chunks stay readable from the receiver.
    async fn stop(&mut self) -> Result<(), CaptureError>;

    fn is_capturing(&self) -> bool;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Where a device gets its data from
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// Directory of .jpg/.png stills replayed as a camera
    ImageDirectory(PathBuf),
    /// WAV file replayed in real time as a microphone
    WavFile(PathBuf),
}

/// Capture backend factory
pub struct CaptureBackendFactory;

impl CaptureBackendFactory {
    pub fn video(
        source: CaptureSource,
        frame_interval: Duration,
    ) -> Result<Box<dyn VideoBackend>, CaptureError> {
        match source {
            CaptureSource::ImageDirectory(dir) => {
                Ok(Box::new(ImageDirectoryCamera::new(dir, frame_interval)))
            }
            CaptureSource::WavFile(path) => Err(CaptureError::device(format!(
                "{} is an audio source, not a camera",
                path.display()
            ))),
        }
    }

    pub fn audio(
        source: CaptureSource,
        chunk_duration: Duration,
    ) -> Result<Box<dyn AudioBackend>, CaptureError> {
        match source {
            CaptureSource::WavFile(path) => Ok(Box::new(WavMicrophone::new(path, chunk_duration))),
            CaptureSource::ImageDirectory(dir) => Err(CaptureError::device(format!(
                "{} is an image source, not a microphone",
                dir.display()
            ))),
        }
    }
}
