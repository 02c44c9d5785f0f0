use crate::{CoreResult, session::EventSink, settings::parse_resolution};

use async_trait::async_trait;

const CAPTURE_FRAME_RATE: u32 = 60;

/// Display-capture request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    /// Requested video frame rate.
    pub frame_rate: u32,
    /// Preferred width, if the resolution label parsed.
    pub ideal_width: Option<u32>,
    /// Preferred height, if the resolution label parsed.
    pub ideal_height: Option<u32>,
    /// Ask for echo cancellation on captured audio.
    pub echo_cancellation: bool,
    /// Ask for noise suppression on captured audio.
    pub noise_suppression: bool,
}

impl CaptureConstraints {
    /// Constraints for a `WIDTHxHEIGHT` resolution label.
    pub fn for_resolution(label: &str) -> Self {
        let parsed = parse_resolution(label);
        Self {
            frame_rate: CAPTURE_FRAME_RATE,
            ideal_width: parsed.map(|(w, _)| w),
            ideal_height: parsed.map(|(_, h)| h),
            echo_cancellation: true,
            noise_suppression: true,
        }
    }
}

/// Identifier of a media track within a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(pub u32);

/// Media carried by a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    /// Screen frames.
    Video,
    /// System or microphone audio.
    Audio,
}

/// Whether a track still produces media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackReadyState {
    /// Producing media.
    Live,
    /// Permanently finished.
    Ended,
}

/// Snapshot of one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackInfo {
    /// Track identifier.
    pub id: TrackId,
    /// Media kind.
    pub kind: TrackKind,
    /// Live or ended.
    pub ready_state: TrackReadyState,
    /// Whether the track is enabled.
    pub enabled: bool,
}

impl TrackInfo {
    /// Enabled and not ended.
    pub fn is_usable(&self) -> bool {
        self.enabled && self.ready_state == TrackReadyState::Live
    }
}

/// A live capture stream handed out by a [`CaptureSource`].
///
/// When a track ends on its own (the user stops sharing), the stream posts
/// a track-ended event through the [`EventSink`] it was created with.
pub trait CaptureStream: Send {
    /// Whether the stream as a whole is still active.
    fn is_active(&self) -> bool;

    /// Current tracks. Removed tracks are not listed.
    fn tracks(&self) -> Vec<TrackInfo>;

    /// Stop a track. Stopping an already ended track succeeds.
    fn stop_track(&mut self, id: TrackId) -> CoreResult<()>;

    /// Detach a track from the stream.
    fn remove_track(&mut self, id: TrackId) -> CoreResult<()>;
}

/// Host display-capture API.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Ask the user for a capture stream.
    ///
    /// A refusal is reported as [`crate::RecorderError::PermissionDenied`].
    async fn request_stream(
        &self,
        constraints: CaptureConstraints,
        events: EventSink,
    ) -> CoreResult<Box<dyn CaptureStream>>;
}
