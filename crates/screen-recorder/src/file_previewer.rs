//! Previews as temp files opened with the system viewer.

use crate::fs_downloader::safe_filename;

use recorder_core::{CoreResult, PreviewUrl, Previewer, RecorderError, RecordingArtifact};

use std::{fs, path::PathBuf};

use tracing::{debug, info};
use uuid::Uuid;

/// [`Previewer`] writing each artifact to its own temp file.
pub struct FilePreviewer {
    dir: PathBuf,
    auto_play: bool,
}

impl FilePreviewer {
    /// Previewer writing into `dir`; `auto_play` opens previews on play.
    pub fn new(dir: impl Into<PathBuf>, auto_play: bool) -> Self {
        Self {
            dir: dir.into(),
            auto_play,
        }
    }
}

impl Previewer for FilePreviewer {
    fn create(&self, artifact: &RecordingArtifact) -> CoreResult<PreviewUrl> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| RecorderError::platform("create preview directory", e.to_string()))?;

        let path = self.dir.join(format!(
            "preview-{}-{}",
            Uuid::new_v4().simple(),
            safe_filename(&artifact.filename)
        ));
        fs::write(&path, &artifact.payload[..])
            .map_err(|e| RecorderError::platform("write preview", e.to_string()))?;

        debug!(path = ?path, size = artifact.size, "Preview written");
        Ok(PreviewUrl(path.to_string_lossy().into_owned()))
    }

    fn revoke(&self, url: &PreviewUrl) -> CoreResult<()> {
        fs::remove_file(url.as_str())
            .map_err(|e| RecorderError::platform("revoke preview", e.to_string()))
    }

    fn play(&self, url: &PreviewUrl) -> CoreResult<()> {
        if !self.auto_play {
            return Ok(());
        }
        open::that(url.as_str())
            .map_err(|e| RecorderError::platform("play preview", e.to_string()))?;
        info!(path = %url.as_str(), "Preview opened");
        Ok(())
    }
}
