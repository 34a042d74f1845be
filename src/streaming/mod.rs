//! Live-analysis path
//!
//! While the camera is active, the streaming loop samples the latest
//! frame on every display-refresh tick, encodes it as a JPEG data URL and
//! hands it to a `FrameTransport`. Submissions run detached and are never
//! queued, retried or cancelled. A slow one is overtaken by the next frame.

mod encode;
mod stream_loop;

pub use encode::encode_frame;
pub use stream_loop::{FrameTransport, StreamStats, StreamingConfig, StreamingLoop};
