use crate::{CoreResult, session::RecordingArtifact};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Auto-incrementing record key, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted recording.
#[derive(Debug, Clone)]
pub struct StoredRecording {
    /// Store key.
    pub id: RecordId,
    /// The recording itself.
    pub artifact: RecordingArtifact,
}

/// Object store of finished recordings.
#[async_trait]
pub trait RecordingStore: Send + Sync {
    /// Persist a recording and return its new key.
    async fn add(&self, artifact: RecordingArtifact) -> CoreResult<RecordId>;

    /// All recordings ordered by key.
    async fn get_all(&self) -> CoreResult<Vec<StoredRecording>>;

    /// Delete one recording. Deleting a missing key succeeds.
    async fn delete(&self, id: RecordId) -> CoreResult<()>;

    /// Delete every recording.
    async fn clear(&self) -> CoreResult<()>;
}
