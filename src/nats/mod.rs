pub mod client;
pub mod messages;

pub use client::{decode_notification, NatsClient};
pub use messages::{FrameMessage, ResultNotification};
