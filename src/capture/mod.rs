pub mod backend;
pub mod controller;
pub mod file;
pub mod recording;

pub use backend::{
    AudioBackend, AudioCapture, AudioChunk, AudioFormat, CaptureBackendFactory, CaptureSource,
    FrameReceiver, VideoBackend, VideoFrame,
};
pub use controller::{CaptureController, DeviceState, VideoStream};
pub use file::{AudioFile, ImageDirectoryCamera, WavMicrophone};
pub use recording::{AudioBlob, RecordingSession};
