//! Recording session: state machine, page actor and view model.

mod artifact;
mod bitrate;
mod events;
mod health;
mod page;
mod state;
mod timer;
mod view;

pub use {
    artifact::{MediaContainer, RecordingArtifact, recording_filename},
    bitrate::{BITRATES, DEFAULT_BITRATE, bitrate_for},
    events::{EventSink, PageCommand, PageMessage, SessionEvent},
    health::{Checkpoint, StreamFault, StreamHealth, check_stream},
    page::{PageHandle, RecorderPage},
    state::{Effect, Input, SessionState, Transition, transition},
    timer::{RecordingTimer, TIMER_RESET_TEXT, format_elapsed},
    view::{Controls, RecorderView, Status, StatusKind},
};

use std::time::Duration;

/// Interval at which the encoder emits chunks.
pub const SLICE_INTERVAL: Duration = Duration::from_millis(1000);
/// Length of one countdown step.
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);
