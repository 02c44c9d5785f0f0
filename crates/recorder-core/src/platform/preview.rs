use crate::{CoreResult, session::RecordingArtifact};

/// Handle to a playable preview of an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewUrl(pub String);

impl PreviewUrl {
    /// The handle as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Creates and releases preview handles.
pub trait Previewer: Send + Sync {
    /// Make `artifact` playable and return its handle.
    fn create(&self, artifact: &RecordingArtifact) -> CoreResult<PreviewUrl>;

    /// Release a handle. Unknown handles are ignored.
    fn revoke(&self, url: &PreviewUrl) -> CoreResult<()>;

    /// Try to start playback.
    fn play(&self, url: &PreviewUrl) -> CoreResult<()>;
}
