use crate::{
    CoreResult,
    platform::{CaptureStream, DownloadId, DownloadState, EncoderEvent, RecordId, TrackId},
    settings::Settings,
};

use std::fmt;

use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Asynchronous completions delivered to a recorder page.
pub enum SessionEvent {
    /// The capture request finished.
    StreamReady(CoreResult<Box<dyn CaptureStream>>),
    /// A capture track ended on its own.
    TrackEnded(TrackId),
    /// One countdown second passed.
    CountdownElapsed,
    /// Encoder notification.
    Encoder(EncoderEvent),
    /// Download progress.
    DownloadChanged {
        /// Download identifier.
        id: DownloadId,
        /// New state.
        state: DownloadState,
    },
}

impl fmt::Debug for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::StreamReady(Ok(_)) => f.write_str("StreamReady(Ok)"),
            SessionEvent::StreamReady(Err(e)) => write!(f, "StreamReady(Err({e}))"),
            SessionEvent::TrackEnded(id) => write!(f, "TrackEnded({})", id.0),
            SessionEvent::CountdownElapsed => f.write_str("CountdownElapsed"),
            SessionEvent::Encoder(EncoderEvent::DataAvailable(chunk)) => {
                write!(f, "Encoder(DataAvailable({} bytes))", chunk.len())
            }
            SessionEvent::Encoder(event) => write!(f, "Encoder({event:?})"),
            SessionEvent::DownloadChanged { id, state } => {
                write!(f, "DownloadChanged({}, {state:?})", id.0)
            }
        }
    }
}

/// User commands accepted by a recorder page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCommand {
    /// Start a recording with the current settings.
    Start,
    /// Stop or cancel the current recording.
    Stop,
    /// Start when idle, stop otherwise.
    Toggle,
    /// Download the recording in the player.
    Download,
    /// Download the newest stored recording.
    DownloadLatest,
    /// Put a stored recording in the player.
    LoadRecording(RecordId),
    /// Download a stored recording.
    DownloadRecording(RecordId),
    /// Delete a stored recording.
    DeleteRecording(RecordId),
    /// Delete every stored recording.
    ClearHistory,
    /// Reload the history listing.
    RefreshHistory,
    /// Edit the settings form without saving.
    UpdateSettings(Settings),
    /// Persist the current settings.
    SaveSettings,
    /// Switch between light and dark.
    ToggleTheme,
    /// Switch minimal mode.
    ToggleMinimalMode,
    /// Release everything and stop the page.
    Shutdown,
}

/// One entry on the page's ordered channel.
#[derive(Debug)]
pub enum PageMessage {
    /// A user command.
    Command(PageCommand),
    /// A completion tagged with the session that caused it.
    Event {
        /// Session that produced the event.
        session_id: Uuid,
        /// The event.
        event: SessionEvent,
    },
}

/// Posts completions for one session onto the page channel.
///
/// Posting after the page is gone is silently ignored.
#[derive(Debug, Clone)]
pub struct EventSink {
    session_id: Uuid,
    tx: mpsc::UnboundedSender<PageMessage>,
}

impl EventSink {
    /// Sink for `session_id`.
    pub fn new(session_id: Uuid, tx: mpsc::UnboundedSender<PageMessage>) -> Self {
        Self { session_id, tx }
    }

    /// Session this sink tags events with.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Post an event.
    pub fn post(&self, event: SessionEvent) {
        let session_id = self.session_id;
        if self.tx.send(PageMessage::Event { session_id, event }).is_err() {
            debug!(session_id = %session_id, "Recorder page gone, event dropped");
        }
    }

    /// Report that a track ended.
    pub fn track_ended(&self, id: TrackId) {
        self.post(SessionEvent::TrackEnded(id));
    }

    /// Report an encoder event.
    pub fn encoder(&self, event: EncoderEvent) {
        self.post(SessionEvent::Encoder(event));
    }

    /// Report download progress.
    pub fn download_changed(&self, id: DownloadId, state: DownloadState) {
        self.post(SessionEvent::DownloadChanged { id, state });
    }
}
