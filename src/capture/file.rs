// File-backed capture devices
//
// Stand-ins for camera and microphone hardware: a directory of still images
// replayed as a video stream and a WAV file replayed in real time as a
// microphone. Acquisition fails with DeviceUnavailable the same way a
// denied permission would.

use anyhow::{Context, Result};
use hound::WavReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::backend::{
    AudioBackend, AudioCapture, AudioChunk, AudioFormat, FrameReceiver, VideoBackend, VideoFrame,
};
use crate::error::CaptureError;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A decoded WAV file
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path).context("Failed to open WAV file")?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }

    pub fn format(&self) -> AudioFormat {
        AudioFormat {
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }
}

/// Background task feeding a device channel, stopped through its token
struct Producer {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Producer {
    async fn shutdown(self, device: &str) {
        self.token.cancel();
        if let Err(e) = self.handle.await {
            warn!("{} producer task panicked: {}", device, e);
        }
    }
}

/// Camera that cycles through the still images of a directory
pub struct ImageDirectoryCamera {
    dir: PathBuf,
    frame_interval: Duration,
    producer: Option<Producer>,
}

impl ImageDirectoryCamera {
    pub fn new(dir: impl Into<PathBuf>, frame_interval: Duration) -> Self {
        Self {
            dir: dir.into(),
            frame_interval,
            producer: None,
        }
    }

    fn load_frames(dir: &Path) -> Result<Vec<VideoFrame>, CaptureError> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            CaptureError::device(format!("Cannot open camera source {}: {}", dir.display(), e))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let mut frames = Vec::with_capacity(paths.len());
        for path in paths {
            match image::open(&path) {
                Ok(img) => {
                    let rgb = img.to_rgb8();
                    frames.push(VideoFrame {
                        width: rgb.width(),
                        height: rgb.height(),
                        rgb: rgb.into_raw(),
                        timestamp_ms: 0,
                    });
                }
                Err(e) => warn!("Skipping unreadable frame {}: {}", path.display(), e),
            }
        }

        if frames.is_empty() {
            return Err(CaptureError::device(format!(
                "No usable images in camera source {}",
                dir.display()
            )));
        }

        Ok(frames)
    }
}

#[async_trait::async_trait]
impl VideoBackend for ImageDirectoryCamera {
    async fn start(&mut self) -> Result<FrameReceiver, CaptureError> {
        if self.producer.is_some() {
            return Err(CaptureError::device("Camera already capturing"));
        }

        let dir = self.dir.clone();
        let frames = tokio::task::spawn_blocking(move || Self::load_frames(&dir))
            .await
            .map_err(|e| CaptureError::device(format!("Camera loader failed: {}", e)))??;

        info!(
            "Camera {} acquired ({} frames, every {:?})",
            self.dir.display(),
            frames.len(),
            self.frame_interval
        );

        let (frame_tx, frame_rx) = watch::channel(None);
        let token = CancellationToken::new();
        let task_token = token.clone();
        let frame_interval = self.frame_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(frame_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let started = tokio::time::Instant::now();

            for frame in frames.iter().cycle() {
                tokio::select! {
                    _ = ticker.tick() => {
                        let mut frame = frame.clone();
                        frame.timestamp_ms = started.elapsed().as_millis() as u64;
                        frame_tx.send_replace(Some(frame));
                    }
                    _ = task_token.cancelled() => break,
                }
            }

            debug!("Camera producer stopped");
        });

        self.producer = Some(Producer { token, handle });
        Ok(frame_rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(producer) = self.producer.take() {
            producer.shutdown("Camera").await;
            info!("Camera {} released", self.dir.display());
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.producer.is_some()
    }

    fn name(&self) -> &str {
        "image-directory-camera"
    }
}

/// Microphone that replays a WAV file in real time
pub struct WavMicrophone {
    path: PathBuf,
    chunk_duration: Duration,
    producer: Option<Producer>,
}

impl WavMicrophone {
    pub fn new(path: impl Into<PathBuf>, chunk_duration: Duration) -> Self {
        Self {
            path: path.into(),
            chunk_duration,
            producer: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for WavMicrophone {
    async fn start(&mut self) -> Result<AudioCapture, CaptureError> {
        if self.producer.is_some() {
            return Err(CaptureError::device("Microphone already capturing"));
        }

        let path = self.path.clone();
        let audio = tokio::task::spawn_blocking(move || AudioFile::open(path))
            .await
            .map_err(|e| CaptureError::device(format!("Microphone loader failed: {}", e)))?
            .map_err(|e| CaptureError::device(format!("{:#}", e)))?;

        let format = audio.format();
        let samples_per_chunk = ((format.sample_rate as u128
            * format.channels as u128
            * self.chunk_duration.as_millis())
            / 1000)
            .max(1) as usize;

        let (chunk_tx, chunk_rx) = mpsc::channel(64);
        let token = CancellationToken::new();
        let task_token = token.clone();
        let chunk_duration = self.chunk_duration;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(chunk_duration);
            let started = tokio::time::Instant::now();

            for samples in audio.samples.chunks(samples_per_chunk) {
                tokio::select! {
                    _ = ticker.tick() => {
                        let chunk = AudioChunk {
                            bytes: samples.iter().flat_map(|s| s.to_le_bytes()).collect(),
                            timestamp_ms: started.elapsed().as_millis() as u64,
                        };
                        if chunk_tx.send(chunk).await.is_err() {
                            break;
                        }
                    }
                    _ = task_token.cancelled() => break,
                }
            }

            debug!("Microphone producer stopped");
        });

        info!(
            "Microphone {} acquired ({}Hz, {} channels)",
            self.path.display(),
            format.sample_rate,
            format.channels
        );

        self.producer = Some(Producer { token, handle });
        Ok(AudioCapture {
            chunks: chunk_rx,
            format,
        })
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(producer) = self.producer.take() {
            producer.shutdown("Microphone").await;
            info!("Microphone {} released", self.path.display());
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.producer.is_some()
    }

    fn name(&self) -> &str {
        "wav-microphone"
    }
}
