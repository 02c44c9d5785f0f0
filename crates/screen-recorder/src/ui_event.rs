use crate::{AppResult, TrayIconState};

use recorder_core::{ScreenBounds, WindowId, WindowInfo, WindowRequest};
use tokio::sync::oneshot;

/// Requests handled on the main thread, where windows and the tray live.
///
/// Requests that need an answer carry a one-shot reply channel.
#[derive(Debug)]
pub enum UiEvent {
    /// Switch the tray icon.
    SetTrayState(TrayIconState),
    /// Open a recorder window.
    CreateWindow {
        /// What to open.
        request: WindowRequest,
        /// Created window.
        reply: oneshot::Sender<AppResult<WindowInfo>>,
    },
    /// Look up a window.
    GetWindow {
        /// Window to look up.
        id: WindowId,
        /// `None` when the window is gone.
        reply: oneshot::Sender<Option<WindowInfo>>,
    },
    /// Focus a window and draw attention to it.
    FocusWindow {
        /// Window to focus.
        id: WindowId,
        /// Whether the window existed.
        reply: oneshot::Sender<bool>,
    },
    /// Close a window.
    RemoveWindow {
        /// Window to close.
        id: WindowId,
        /// Whether the window existed.
        reply: oneshot::Sender<bool>,
    },
    /// Logical size of the primary monitor.
    ScreenBounds {
        /// `None` when no monitor is reported.
        reply: oneshot::Sender<Option<ScreenBounds>>,
    },
    /// Render a window title.
    SetWindowTitle {
        /// Target window.
        id: WindowId,
        /// New title.
        title: String,
    },
    /// Leave the event loop.
    Shutdown,
}
