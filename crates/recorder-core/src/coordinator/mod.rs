//! Singleton recorder-window lifecycle.

#[allow(clippy::module_inception)]
mod coordinator;
mod debounce;
mod geometry;
mod message;

pub use {
    coordinator::WindowCoordinator, debounce::Debounce, geometry::centered_geometry,
    message::CoordinatorMessage,
};

use crate::platform::ScreenBounds;

use std::time::Duration;

/// Page loaded into the recorder window.
pub const RECORDER_URL: &str = "recorder.html";
/// Recorder window content width.
pub const RECORDER_WIDTH: u32 = 850;
/// Recorder window content height.
pub const RECORDER_HEIGHT: u32 = 700;
/// Screen assumed when the platform cannot report one.
pub const FALLBACK_SCREEN: ScreenBounds = ScreenBounds {
    width: 1920,
    height: 1080,
};
/// Minimum spacing between accepted activations.
pub const ACTIVATION_DEBOUNCE: Duration = Duration::from_millis(250);
