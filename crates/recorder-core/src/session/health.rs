use crate::platform::CaptureStream;

use std::fmt;

/// Point in a session at which the capture stream is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// Right after the stream was handed out.
    AfterAcquire,
    /// Between countdown ticks.
    Countdown,
    /// Immediately before the encoder starts.
    BeforeStart,
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Checkpoint::AfterAcquire => "after acquire",
            Checkpoint::Countdown => "during countdown",
            Checkpoint::BeforeStart => "before start",
        };
        f.write_str(name)
    }
}

/// What is wrong with a stream that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFault {
    /// The stream is no longer active.
    Inactive,
    /// The stream has no tracks.
    NoTracks,
    /// At least one track is disabled or ended.
    TracksInactive,
}

impl StreamFault {
    /// Status line shown when this fault is found at `checkpoint`.
    pub fn status_text(self, checkpoint: Checkpoint) -> &'static str {
        match (checkpoint, self) {
            (Checkpoint::AfterAcquire, StreamFault::Inactive) => {
                "Stream is inactive after creation"
            }
            (Checkpoint::AfterAcquire, StreamFault::NoTracks) => "No tracks available",
            (Checkpoint::AfterAcquire, StreamFault::TracksInactive) => {
                "Some tracks are inactive after creation"
            }
            (Checkpoint::Countdown, StreamFault::Inactive) => {
                "Stream became inactive during countdown"
            }
            (Checkpoint::Countdown, StreamFault::NoTracks) => "No tracks available",
            (Checkpoint::Countdown, StreamFault::TracksInactive) => {
                "Some tracks became inactive during countdown"
            }
            (Checkpoint::BeforeStart, StreamFault::Inactive) => {
                "Stream inactive before recording start"
            }
            (Checkpoint::BeforeStart, StreamFault::NoTracks) => {
                "No tracks available for recording"
            }
            (Checkpoint::BeforeStart, StreamFault::TracksInactive) => {
                "Some tracks are inactive before recording start"
            }
        }
    }
}

impl fmt::Display for StreamFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamFault::Inactive => "stream inactive",
            StreamFault::NoTracks => "no tracks",
            StreamFault::TracksInactive => "tracks inactive",
        };
        f.write_str(name)
    }
}

/// Result of validating a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamHealth {
    /// Active, with at least one track, all usable.
    Healthy,
    /// Validation failed.
    Faulted(StreamFault),
}

/// Validate a stream: active, at least one track, every track enabled and live.
pub fn check_stream(stream: &dyn CaptureStream) -> StreamHealth {
    if !stream.is_active() {
        return StreamHealth::Faulted(StreamFault::Inactive);
    }

    let tracks = stream.tracks();
    if tracks.is_empty() {
        return StreamHealth::Faulted(StreamFault::NoTracks);
    }

    if tracks.iter().any(|t| !t.is_usable()) {
        return StreamHealth::Faulted(StreamFault::TracksInactive);
    }

    StreamHealth::Healthy
}
