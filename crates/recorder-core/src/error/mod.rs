use crate::session::{Checkpoint, StreamFault};

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;
use tracing::{debug, warn};

/// Recorder errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// The user or the platform refused the display-capture request.
    #[error("Screen capture permission denied: {reason} {location}")]
    PermissionDenied {
        /// Platform-provided description of the refusal.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture stream ended or was invalidated at a checkpoint.
    #[error("Stream check failed {checkpoint}: {fault} {location}")]
    StreamInactive {
        /// Where in the session the check ran.
        checkpoint: Checkpoint,
        /// What was wrong with the stream.
        fault: StreamFault,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The encoder stopped without producing a single chunk.
    #[error("No data was recorded {location}")]
    EmptyRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The encoder could not be created, started, or reported a failure.
    #[error("Encoder error: {reason} {location}")]
    Encoder {
        /// Description of the encoder failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A window, track, preview, or download call failed.
    #[error("Platform call {operation} failed: {reason} {location}")]
    PlatformCall {
        /// Name of the failed platform operation.
        operation: &'static str,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Reading or writing persisted recordings or settings failed.
    #[error("Storage operation {operation} failed: {reason} {location}")]
    Storage {
        /// Name of the failed storage operation.
        operation: &'static str,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A stored recording was requested by an id that does not exist.
    #[error("Recording {id} not found {location}")]
    NotFound {
        /// The requested record id.
        id: u64,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// How a failure is handled wherever it surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Not retried; the hosting window is replaced by a fresh one.
    Relaunch,
    /// Tear the session down and return to idle with a status message.
    AbortToIdle,
    /// Log and keep going with best-effort cleanup.
    NonFatal,
    /// Log and show a degraded, non-crashing view.
    Degraded,
}

impl RecorderError {
    /// Classify this error. This table is the single place failure handling is decided.
    pub fn policy(&self) -> FailurePolicy {
        match self {
            RecorderError::PermissionDenied { .. } => FailurePolicy::Relaunch,
            RecorderError::StreamInactive { .. }
            | RecorderError::EmptyRecording { .. }
            | RecorderError::Encoder { .. } => FailurePolicy::AbortToIdle,
            RecorderError::PlatformCall { .. } => FailurePolicy::NonFatal,
            RecorderError::Storage { .. } | RecorderError::NotFound { .. } => {
                FailurePolicy::Degraded
            }
        }
    }

    /// Short user-facing status line for this error.
    pub fn status_text(&self) -> String {
        match self {
            RecorderError::PermissionDenied { .. } => {
                "Permission denied - please try again".to_string()
            }
            RecorderError::StreamInactive {
                checkpoint, fault, ..
            } => fault.status_text(*checkpoint).to_string(),
            RecorderError::EmptyRecording { .. } | RecorderError::Encoder { .. } => {
                "Recording failed".to_string()
            }
            RecorderError::PlatformCall { .. } => "Recording stopped with errors".to_string(),
            RecorderError::Storage { .. } => "Storage unavailable".to_string(),
            RecorderError::NotFound { .. } => "Recording not found".to_string(),
        }
    }

    /// Build a [`RecorderError::PermissionDenied`] at the caller's location.
    #[track_caller]
    pub fn permission_denied(reason: impl Into<String>) -> Self {
        RecorderError::PermissionDenied {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Build a [`RecorderError::StreamInactive`] at the caller's location.
    #[track_caller]
    pub fn stream_inactive(checkpoint: Checkpoint, fault: StreamFault) -> Self {
        RecorderError::StreamInactive {
            checkpoint,
            fault,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Build a [`RecorderError::Encoder`] at the caller's location.
    #[track_caller]
    pub fn encoder(reason: impl Into<String>) -> Self {
        RecorderError::Encoder {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Build a [`RecorderError::PlatformCall`] at the caller's location.
    #[track_caller]
    pub fn platform(operation: &'static str, reason: impl Into<String>) -> Self {
        RecorderError::PlatformCall {
            operation,
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Build a [`RecorderError::Storage`] at the caller's location.
    #[track_caller]
    pub fn storage(operation: &'static str, reason: impl Into<String>) -> Self {
        RecorderError::Storage {
            operation,
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Apply the failure table at an external-call boundary.
///
/// Returns the value on success. On failure the error is logged according to
/// its [`FailurePolicy`] and `None` is returned so the caller can continue
/// with its cleanup path.
pub fn best_effort<T>(result: Result<T>, operation: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            match e.policy() {
                FailurePolicy::NonFatal => {
                    debug!(operation, error = %e, "Platform call failed, continuing");
                }
                policy => {
                    warn!(operation, ?policy, error = %e, "Call failed, continuing");
                }
            }
            None
        }
    }
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
