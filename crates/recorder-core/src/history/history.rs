use crate::{
    CoreResult, RecorderError,
    history::{format_date, format_file_size},
    platform::{RecordId, RecordingStore, StoredRecording},
    session::RecordingArtifact,
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// One row of the history panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Store key.
    pub id: RecordId,
    /// File name.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// Formatted size.
    pub size_text: String,
    /// Formatted local creation date.
    pub date_text: String,
}

impl HistoryEntry {
    fn from_stored(stored: &StoredRecording) -> Self {
        Self {
            id: stored.id,
            filename: stored.artifact.filename.clone(),
            size: stored.artifact.size,
            size_text: format_file_size(stored.artifact.size),
            date_text: format_date(stored.artifact.created_at_ms),
        }
    }

    /// `size • date` as shown under the file name.
    pub fn meta_text(&self) -> String {
        format!("{} • {}", self.size_text, self.date_text)
    }
}

/// What the history panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryListing {
    /// Stored recordings, ordered by key.
    Entries(Vec<HistoryEntry>),
    /// Nothing stored.
    Empty,
    /// The store could not be read.
    Error,
}

impl HistoryListing {
    /// Placeholder line for listings without entries.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            HistoryListing::Entries(_) => None,
            HistoryListing::Empty => Some("No recordings found"),
            HistoryListing::Error => Some("Error loading recordings"),
        }
    }
}

/// History operations over a [`RecordingStore`].
#[derive(Clone)]
pub struct RecordingHistory {
    store: Arc<dyn RecordingStore>,
}

impl RecordingHistory {
    /// History backed by `store`.
    pub fn new(store: Arc<dyn RecordingStore>) -> Self {
        Self { store }
    }

    /// Persist a finished recording.
    #[instrument(skip(self, artifact), fields(filename = %artifact.filename, size = artifact.size))]
    pub async fn save(&self, artifact: RecordingArtifact) -> CoreResult<RecordId> {
        let id = self.store.add(artifact).await?;
        info!(record_id = %id, "Recording saved to history");
        Ok(id)
    }

    /// Current listing. Store failures become [`HistoryListing::Error`].
    #[instrument(skip(self))]
    pub async fn list(&self) -> HistoryListing {
        match self.store.get_all().await {
            Ok(records) if records.is_empty() => HistoryListing::Empty,
            Ok(records) => {
                debug!(count = records.len(), "History loaded");
                HistoryListing::Entries(records.iter().map(HistoryEntry::from_stored).collect())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load history");
                HistoryListing::Error
            }
        }
    }

    /// The stored recording with key `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::NotFound`] when no such record exists.
    pub async fn find(&self, id: RecordId) -> CoreResult<StoredRecording> {
        self.store
            .get_all()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| RecorderError::NotFound {
                id: id.0,
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// The recording with the highest key, if any.
    pub async fn newest(&self) -> CoreResult<Option<StoredRecording>> {
        Ok(self.store.get_all().await?.into_iter().max_by_key(|r| r.id))
    }

    /// Delete one recording.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> CoreResult<()> {
        self.store.delete(id).await?;
        info!(record_id = %id, "Recording deleted");
        Ok(())
    }

    /// Delete every recording.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> CoreResult<()> {
        self.store.clear().await?;
        info!("History cleared");
        Ok(())
    }
}
