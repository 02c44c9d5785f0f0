//! Screen Recorder Core Library
//!
//! Platform-agnostic logic of a screen recorder: a coordinator that keeps a
//! single recorder window alive, and a recorder page that runs one
//! recording session at a time against host-provided capture, encoder,
//! storage, download and preview APIs.
//!
//! # Example
//!
//! ```no_run
//! use recorder_core::{PageCommand, PagePlatform, RecorderPage};
//!
//! async fn record(platform: PagePlatform) {
//!     let (page, handle) = RecorderPage::open(platform);
//!     tokio::spawn(page.run());
//!
//!     let _ = handle.send(PageCommand::Start);
//!     tokio::time::sleep(std::time::Duration::from_secs(10)).await;
//!     let _ = handle.send(PageCommand::Stop);
//!
//!     println!("Status: {}", handle.view().status.text);
//! }
//! ```

mod coordinator;
mod error;
mod history;
mod platform;
mod session;
mod settings;
mod store;

pub use {
    coordinator::{
        ACTIVATION_DEBOUNCE, CoordinatorMessage, Debounce, FALLBACK_SCREEN, RECORDER_HEIGHT,
        RECORDER_URL, RECORDER_WIDTH, WindowCoordinator, centered_geometry,
    },
    error::{FailurePolicy, RecorderError, Result as CoreResult, best_effort},
    history::{HistoryEntry, HistoryListing, RecordingHistory, format_date, format_file_size},
    platform::{
        CaptureConstraints, CaptureSource, CaptureStream, DownloadId, DownloadState, Downloader,
        Encoder, EncoderConfig, EncoderEvent, EncoderFactory, EncoderState, PageHost,
        PagePlatform, PreviewUrl, Previewer, RecordId, RecordingStore, ScreenBounds,
        SettingsStore, StoredRecording, TrackId, TrackInfo, TrackKind, TrackReadyState,
        WindowGeometry, WindowId, WindowInfo, WindowKind, WindowPlatform, WindowRequest,
    },
    session::{
        BITRATES, COUNTDOWN_TICK, Checkpoint, Controls, DEFAULT_BITRATE, Effect, EventSink, Input,
        MediaContainer, PageCommand, PageHandle, PageMessage, RecorderPage, RecorderView,
        RecordingArtifact, RecordingTimer, SLICE_INTERVAL, SessionEvent, SessionState, Status,
        StatusKind, StreamFault, StreamHealth, TIMER_RESET_TEXT, Transition, bitrate_for,
        check_stream, format_elapsed, recording_filename, transition,
    },
    settings::{Settings, Theme, UiPreferences, parse_resolution},
    store::MemoryStore,
};

#[cfg(test)]
mod tests;
