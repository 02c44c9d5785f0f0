//! Downloads as file copies into a target directory.

use recorder_core::{
    CoreResult, DownloadId, DownloadState, Downloader, EventSink, RecorderError,
    RecordingArtifact,
};

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Last path component of `filename`, or a fallback for empty names.
pub fn safe_filename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("recording")
        .to_string()
}

/// First `name (N).ext` in `dir` that does not exist yet.
pub fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    let extension = path.extension().and_then(|e| e.to_str());

    (1u32..)
        .map(|n| match extension {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(candidate)
}

/// [`Downloader`] copying artifacts into a directory.
///
/// Writes run in the background. A write that fails in the target directory
/// is retried in the temp directory and reported as interrupted.
pub struct FsDownloader {
    dir: PathBuf,
    fallback_dir: PathBuf,
    next_id: Arc<AtomicU64>,
}

impl FsDownloader {
    /// Downloader writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_fallback(dir, std::env::temp_dir())
    }

    /// Downloader writing into `dir`, falling back to `fallback_dir`.
    pub fn with_fallback(dir: impl Into<PathBuf>, fallback_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            fallback_dir: fallback_dir.into(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

#[async_trait]
impl Downloader for FsDownloader {
    #[instrument(skip(self, artifact, events))]
    async fn download(
        &self,
        artifact: &RecordingArtifact,
        filename: &str,
        save_as: bool,
        events: EventSink,
    ) -> CoreResult<DownloadId> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| RecorderError::platform("create download directory", e.to_string()))?;

        let name = safe_filename(filename);
        let target = if save_as {
            unique_path(&self.dir, &name)
        } else {
            self.dir.join(&name)
        };

        let id = DownloadId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let payload = Arc::clone(&artifact.payload);
        let fallback = self.fallback_dir.join(&name);

        debug!(download = id.0, target = ?target, "Download started");
        events.download_changed(id, DownloadState::InProgress);

        tokio::spawn(async move {
            match fs::write(&target, &payload[..]).await {
                Ok(()) => {
                    info!(download = id.0, target = ?target, "Download completed");
                    events.download_changed(id, DownloadState::Complete);
                }
                Err(e) => {
                    warn!(download = id.0, error = %e, "Download interrupted");
                    if let Err(e) = fs::write(&fallback, &payload[..]).await {
                        warn!(download = id.0, error = %e, "Fallback copy failed");
                    }
                    events.download_changed(id, DownloadState::Interrupted);
                }
            }
        });

        Ok(id)
    }
}
