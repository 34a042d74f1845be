use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::capture::CaptureSource;
use crate::session::SessionConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub backend: BackendConfig,
    /// Frames stream through NATS when present, otherwise through the
    /// one-shot face endpoint
    pub nats: Option<NatsConfig>,
    pub capture: CaptureConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct NatsConfig {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    /// Directory of still images replayed as the camera
    pub video_source: String,
    /// WAV file replayed as the microphone
    pub audio_source: String,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default = "default_audio_chunk_ms")]
    pub audio_chunk_ms: u64,
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_jpeg_quality() -> u8 {
    80
}

fn default_audio_chunk_ms() -> u64 {
    100
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("AFFECT").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl CaptureConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn audio_chunk(&self) -> Duration {
        Duration::from_millis(self.audio_chunk_ms)
    }

    pub fn video(&self) -> CaptureSource {
        CaptureSource::ImageDirectory(expand_path(&self.video_source))
    }

    pub fn audio(&self) -> CaptureSource {
        CaptureSource::WavFile(expand_path(&self.audio_source))
    }

    /// Session settings for a fresh session
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            frame_interval: self.frame_interval(),
            jpeg_quality: self.jpeg_quality,
            ..SessionConfig::default()
        }
    }
}

/// Expand a leading `~` to the home directory
fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[service]
name = "affect-orchestrator"

[service.http]
bind = "127.0.0.1"
port = 3100

[backend]
base_url = "http://localhost:8000"

[capture]
video_source = "~/captures/frames"
audio_source = "fixtures/voice.wav"
jpeg_quality = 70
"#;

    #[test]
    fn test_load_with_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let path = file.path().to_str().unwrap();
        let cfg = Config::load(path).unwrap();

        assert_eq!(cfg.service.http.port, 3100);
        assert_eq!(cfg.backend.base_url, "http://localhost:8000");
        assert!(cfg.nats.is_none());
        assert_eq!(cfg.capture.frame_interval(), Duration::from_millis(16));
        assert_eq!(cfg.capture.audio_chunk(), Duration::from_millis(100));
        assert_eq!(cfg.capture.session().jpeg_quality, 70);
    }

    #[test]
    fn test_tilde_is_expanded() {
        let home = shellexpand::tilde("~").into_owned();
        let path = expand_path("~/captures/frames");
        assert_eq!(path, PathBuf::from(format!("{}/captures/frames", home)));
    }
}
