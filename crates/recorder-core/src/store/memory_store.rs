use crate::{
    CoreResult,
    platform::{RecordId, RecordingStore, StoredRecording},
    session::RecordingArtifact,
};

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug)]
struct Inner {
    next_id: u64,
    records: BTreeMap<RecordId, RecordingArtifact>,
}

/// In-process [`RecordingStore`]. Keys start at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                records: BTreeMap::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordingStore for MemoryStore {
    async fn add(&self, artifact: RecordingArtifact) -> CoreResult<RecordId> {
        let mut inner = self.inner.lock().await;
        let id = RecordId(inner.next_id);
        inner.next_id += 1;
        inner.records.insert(id, artifact);
        debug!(record_id = %id, "Recording stored in memory");
        Ok(id)
    }

    async fn get_all(&self) -> CoreResult<Vec<StoredRecording>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .records
            .iter()
            .map(|(id, artifact)| StoredRecording {
                id: *id,
                artifact: artifact.clone(),
            })
            .collect())
    }

    async fn delete(&self, id: RecordId) -> CoreResult<()> {
        self.inner.lock().await.records.remove(&id);
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        self.inner.lock().await.records.clear();
        Ok(())
    }
}
