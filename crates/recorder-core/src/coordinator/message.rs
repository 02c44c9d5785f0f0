use crate::platform::WindowId;

/// Signals handled by the [`crate::WindowCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorMessage {
    /// The host process started.
    Startup,
    /// The user clicked the tray icon or toolbar button.
    Activate,
    /// A recorder page asked for a fresh window.
    ReopenRequest,
    /// A window was closed.
    WindowRemoved(WindowId),
    /// A window gained focus.
    FocusChanged(WindowId),
}
