use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::backend::{AudioChunk, AudioFormat};

/// The sealed result of a recording: every chunk concatenated in arrival order
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlob {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
    pub chunk_count: usize,
}

impl AudioBlob {
    pub fn duration_secs(&self) -> f64 {
        let bytes_per_second =
            self.format.sample_rate as f64 * self.format.channels as f64 * 2.0;
        if bytes_per_second == 0.0 {
            return 0.0;
        }
        self.bytes.len() as f64 / bytes_per_second
    }

    /// Wrap the PCM blob in a WAV container for upload
    pub fn to_wav(&self) -> Result<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: self.format.channels,
            sample_rate: self.format.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer =
                hound::WavWriter::new(&mut cursor, spec).context("Failed to create WAV writer")?;
            for pair in self.bytes.chunks_exact(2) {
                writer
                    .write_sample(i16::from_le_bytes([pair[0], pair[1]]))
                    .context("Failed to write sample to WAV")?;
            }
            writer.finalize().context("Failed to finalize WAV")?;
        }

        Ok(cursor.into_inner())
    }
}

/// One audio recording: an elapsed-seconds counter and an append-only chunk
/// list while active, a single sealed blob afterwards.
pub struct RecordingSession {
    id: String,
    started_at: DateTime<Utc>,
    format: AudioFormat,
    elapsed_secs: Arc<AtomicU64>,
    chunks: Arc<Mutex<Vec<Vec<u8>>>>,
    token: CancellationToken,
    collector: Option<JoinHandle<()>>,
    timer: Option<JoinHandle<()>>,
    blob: Option<AudioBlob>,
}

impl RecordingSession {
    /// Open a session and start collecting chunks and counting seconds
    pub fn start(chunk_rx: mpsc::Receiver<AudioChunk>, format: AudioFormat) -> Self {
        let id = format!("recording-{}", uuid::Uuid::new_v4());
        info!("Recording session {} started", id);

        let token = CancellationToken::new();
        let chunks = Arc::new(Mutex::new(Vec::new()));
        let elapsed_secs = Arc::new(AtomicU64::new(0));

        let collector = tokio::spawn(collect_chunks(chunk_rx, Arc::clone(&chunks), token.clone()));
        let timer = tokio::spawn(count_seconds(Arc::clone(&elapsed_secs), token.clone()));

        Self {
            id,
            started_at: Utc::now(),
            format,
            elapsed_secs,
            chunks,
            token,
            collector: Some(collector),
            timer: Some(timer),
            blob: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs.load(Ordering::SeqCst)
    }

    pub fn chunk_count(&self) -> usize {
        match &self.blob {
            Some(blob) => blob.chunk_count,
            None => self.chunks.lock().map(|c| c.len()).unwrap_or(0),
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.blob.is_some()
    }

    pub fn blob(&self) -> Option<&AudioBlob> {
        self.blob.as_ref()
    }

    /// Stop the timer, drain delivered chunks and produce the blob.
    ///
    /// Returns the blob on the first call only.
    pub async fn seal(&mut self) -> Option<AudioBlob> {
        if self.blob.is_some() {
            return None;
        }

        self.token.cancel();
        for (name, task) in [("Chunk collector", self.collector.take()), ("Timer", self.timer.take())] {
            if let Some(task) = task {
                if let Err(e) = task.await {
                    error!("{} task panicked: {}", name, e);
                }
            }
        }

        let chunks = match self.chunks.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        let blob = AudioBlob {
            chunk_count: chunks.len(),
            bytes: chunks.concat(),
            format: self.format,
        };

        info!(
            "Recording session {} sealed: {} chunks, {} bytes, {}s elapsed",
            self.id,
            blob.chunk_count,
            blob.bytes.len(),
            self.elapsed_secs()
        );

        self.blob = Some(blob.clone());
        Some(blob)
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn collect_chunks(
    mut chunk_rx: mpsc::Receiver<AudioChunk>,
    chunks: Arc<Mutex<Vec<Vec<u8>>>>,
    token: CancellationToken,
) {
    let push = |chunk: AudioChunk| {
        if let Ok(mut guard) = chunks.lock() {
            guard.push(chunk.bytes);
        }
    };

    loop {
        tokio::select! {
            biased;
            chunk = chunk_rx.recv() => match chunk {
                Some(chunk) => push(chunk),
                None => break,
            },
            _ = token.cancelled() => {
                while let Ok(chunk) = chunk_rx.try_recv() {
                    push(chunk);
                }
                break;
            }
        }
    }
}

async fn count_seconds(elapsed_secs: Arc<AtomicU64>, token: CancellationToken) {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    // First tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                elapsed_secs.fetch_add(1, Ordering::SeqCst);
            }
            _ = token.cancelled() => break,
        }
    }
}
