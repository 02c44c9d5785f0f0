use crate::{
    CoreResult,
    platform::CaptureStream,
    session::{EventSink, MediaContainer},
};

use std::time::Duration;

/// Lifecycle state reported by an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    /// Not started, or fully stopped.
    Inactive,
    /// Producing chunks.
    Recording,
    /// Started but paused.
    Paused,
}

/// Encoder construction parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Output container MIME type.
    pub mime_type: String,
    /// Target bitrate.
    pub bits_per_second: u64,
    /// Codec label chosen in settings.
    pub codec: String,
    /// Resolution label chosen in settings.
    pub resolution: String,
}

/// Asynchronous encoder notifications, delivered through the [`EventSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    /// Encoding began.
    Started,
    /// A chunk of encoded output. May be empty.
    DataAvailable(Vec<u8>),
    /// Encoding finished and all data has been delivered.
    Stopped,
    /// Encoding failed.
    Failed(String),
}

/// A running media encoder bound to one capture stream.
pub trait Encoder: Send {
    /// Current state.
    fn state(&self) -> EncoderState;

    /// Start encoding, emitting a chunk every `slice`.
    fn start(&mut self, slice: Duration) -> CoreResult<()>;

    /// Emit whatever is buffered now.
    fn request_data(&mut self) -> CoreResult<()>;

    /// Stop encoding. A final chunk and then `Stopped` follow as events.
    fn stop(&mut self) -> CoreResult<()>;
}

/// Creates encoders for capture streams.
pub trait EncoderFactory: Send + Sync {
    /// Container this factory produces for a codec label.
    fn container(&self, codec: &str) -> MediaContainer;

    /// Build an encoder over `stream`.
    fn create(
        &self,
        stream: &dyn CaptureStream,
        config: EncoderConfig,
        events: EventSink,
    ) -> CoreResult<Box<dyn Encoder>>;
}
