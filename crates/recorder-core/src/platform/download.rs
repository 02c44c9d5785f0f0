use crate::{
    CoreResult,
    session::{EventSink, RecordingArtifact},
};

use async_trait::async_trait;

/// Identifier of a started download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DownloadId(pub u64);

/// Download progress reported through the [`EventSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadState {
    /// Still writing.
    InProgress,
    /// Finished successfully.
    Complete,
    /// Stopped before completion.
    Interrupted,
}

/// Host download API.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Start saving `artifact` under `filename`.
    ///
    /// With `save_as` the host must not overwrite an existing file.
    async fn download(
        &self,
        artifact: &RecordingArtifact,
        filename: &str,
        save_as: bool,
        events: EventSink,
    ) -> CoreResult<DownloadId>;
}
