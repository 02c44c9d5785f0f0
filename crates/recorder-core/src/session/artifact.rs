use crate::{CoreResult, RecorderError};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Output container of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaContainer {
    /// `video/webm`
    WebM,
    /// `video/mp4`
    Mp4,
    /// `video/x-matroska`
    Matroska,
    /// `image/gif`
    Gif,
}

impl MediaContainer {
    /// MIME type of the container.
    pub fn mime_type(self) -> &'static str {
        match self {
            MediaContainer::WebM => "video/webm",
            MediaContainer::Mp4 => "video/mp4",
            MediaContainer::Matroska => "video/x-matroska",
            MediaContainer::Gif => "image/gif",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            MediaContainer::WebM => "webm",
            MediaContainer::Mp4 => "mp4",
            MediaContainer::Matroska => "mkv",
            MediaContainer::Gif => "gif",
        }
    }

    /// Container for a MIME type. Codec parameters after `;` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let base = mime.split(';').next().unwrap_or(mime).trim();
        match base {
            "video/webm" => Some(MediaContainer::WebM),
            "video/mp4" => Some(MediaContainer::Mp4),
            "video/x-matroska" => Some(MediaContainer::Matroska),
            "image/gif" => Some(MediaContainer::Gif),
            _ => None,
        }
    }
}

/// Build the file name of a new recording.
pub fn recording_filename(resolution: &str, created_at_ms: i64, container: MediaContainer) -> String {
    format!(
        "screen-recording-{}-{}.{}",
        resolution,
        created_at_ms,
        container.extension()
    )
}

/// A finished recording. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingArtifact {
    /// Encoded bytes.
    pub payload: Arc<[u8]>,
    /// Suggested file name.
    pub filename: String,
    /// Creation time in epoch milliseconds.
    pub created_at_ms: i64,
    /// Payload length in bytes.
    pub size: u64,
    /// Container MIME type.
    pub mime_type: String,
    /// Resolution label the recording was made with.
    pub resolution: String,
}

impl RecordingArtifact {
    /// Concatenate encoder chunks into an artifact.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::EmptyRecording`] when there are no chunks.
    #[track_caller]
    pub fn from_chunks(
        chunks: &[Vec<u8>],
        container: MediaContainer,
        resolution: &str,
        created_at_ms: i64,
    ) -> CoreResult<Self> {
        if chunks.is_empty() {
            return Err(RecorderError::EmptyRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let payload: Vec<u8> = chunks.concat();

        Ok(Self {
            size: payload.len() as u64,
            payload: payload.into(),
            filename: recording_filename(resolution, created_at_ms, container),
            created_at_ms,
            mime_type: container.mime_type().to_string(),
            resolution: resolution.to_string(),
        })
    }

    /// Container derived from the MIME type, if recognised.
    pub fn container(&self) -> Option<MediaContainer> {
        MediaContainer::from_mime(&self.mime_type)
    }
}
