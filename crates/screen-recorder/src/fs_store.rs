//! Recording history on disk.
//!
//! One blob file per recording plus a TOML index. The index is rewritten
//! atomically after every change; an async mutex serializes transactions.

use recorder_core::{
    CoreResult, RecordId, RecorderError, RecordingArtifact, RecordingStore, StoredRecording,
};

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, info, instrument, warn};

const INDEX_FILE: &str = "index.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    id: RecordId,
    filename: String,
    created_at_ms: i64,
    size: u64,
    mime_type: String,
    resolution: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Index {
    next_id: u64,
    #[serde(default)]
    records: Vec<IndexEntry>,
}

impl Default for Index {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }
}

/// [`RecordingStore`] over a directory.
pub struct FsStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FsStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    fn blob_path(&self, id: RecordId) -> PathBuf {
        self.dir.join(format!("{}.bin", id.0))
    }

    async fn read_index(&self) -> CoreResult<Index> {
        let path = self.dir.join(INDEX_FILE);
        match fs::read_to_string(&path).await {
            Ok(contents) => toml::from_str(&contents)
                .map_err(|e| RecorderError::storage("read index", e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Index::default()),
            Err(e) => Err(RecorderError::storage("read index", e.to_string())),
        }
    }

    async fn write_index(&self, index: &Index) -> CoreResult<()> {
        let contents = toml::to_string_pretty(index)
            .map_err(|e| RecorderError::storage("write index", e.to_string()))?;
        write_atomic(&self.dir.join(INDEX_FILE), contents.as_bytes()).await
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    let storage = |e: std::io::Error| RecorderError::storage("write file", e.to_string());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(storage)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path).await.map_err(storage)?;
    file.write_all(bytes).await.map_err(storage)?;
    file.sync_all().await.map_err(storage)?;
    drop(file);

    fs::rename(&temp_path, path).await.map_err(storage)
}

#[async_trait]
impl RecordingStore for FsStore {
    #[instrument(skip(self, artifact), fields(filename = %artifact.filename))]
    async fn add(&self, artifact: RecordingArtifact) -> CoreResult<RecordId> {
        let _guard = self.lock.lock().await;

        let mut index = self.read_index().await?;
        let id = RecordId(index.next_id);

        write_atomic(&self.blob_path(id), &artifact.payload).await?;

        index.next_id += 1;
        index.records.push(IndexEntry {
            id,
            filename: artifact.filename,
            created_at_ms: artifact.created_at_ms,
            size: artifact.size,
            mime_type: artifact.mime_type,
            resolution: artifact.resolution,
        });
        self.write_index(&index).await?;

        info!(record_id = %id, "Recording written to disk");
        Ok(id)
    }

    async fn get_all(&self) -> CoreResult<Vec<StoredRecording>> {
        let _guard = self.lock.lock().await;

        let mut index = self.read_index().await?;
        index.records.sort_by_key(|entry| entry.id);

        let mut stored = Vec::with_capacity(index.records.len());
        for entry in index.records {
            let payload = match fs::read(self.blob_path(entry.id)).await {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(record_id = %entry.id, error = %e, "Recording blob missing, skipped");
                    continue;
                }
            };

            stored.push(StoredRecording {
                id: entry.id,
                artifact: RecordingArtifact {
                    payload: payload.into(),
                    filename: entry.filename,
                    created_at_ms: entry.created_at_ms,
                    size: entry.size,
                    mime_type: entry.mime_type,
                    resolution: entry.resolution,
                },
            });
        }

        debug!(count = stored.len(), "Recordings read from disk");
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RecordId) -> CoreResult<()> {
        let _guard = self.lock.lock().await;

        let mut index = self.read_index().await?;
        index.records.retain(|entry| entry.id != id);
        self.write_index(&index).await?;

        if let Err(e) = fs::remove_file(self.blob_path(id)).await {
            debug!(record_id = %id, error = %e, "Blob already gone");
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> CoreResult<()> {
        let _guard = self.lock.lock().await;

        let mut index = self.read_index().await?;
        let removed: Vec<RecordId> = index.records.drain(..).map(|entry| entry.id).collect();
        self.write_index(&index).await?;

        for id in removed {
            if let Err(e) = fs::remove_file(self.blob_path(id)).await {
                debug!(record_id = %id, error = %e, "Blob already gone");
            }
        }
        Ok(())
    }
}
