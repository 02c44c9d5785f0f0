//! Stored-recording history.

mod format;
#[allow(clippy::module_inception)]
mod history;

pub use {
    format::{format_date, format_file_size},
    history::{HistoryEntry, HistoryListing, RecordingHistory},
};
