use crate::CoreResult;

use async_trait::async_trait;

/// Opaque platform identifier of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// Window chrome kind. Only [`WindowKind::Popup`] hosts the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// Regular browser-style window.
    Normal,
    /// Chromeless popup window.
    Popup,
    /// Docked panel.
    Panel,
}

/// What the platform reports about a live window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowInfo {
    /// Window identifier.
    pub id: WindowId,
    /// Window chrome kind.
    pub kind: WindowKind,
    /// Whether the window belongs to a private profile.
    pub incognito: bool,
}

/// Available screen area in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBounds {
    /// Available width.
    pub width: u32,
    /// Available height.
    pub height: u32,
}

/// Position and size of a window in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    /// Distance from the left screen edge.
    pub left: i32,
    /// Distance from the top screen edge.
    pub top: i32,
    /// Content width.
    pub width: u32,
    /// Content height.
    pub height: u32,
}

/// Parameters for creating a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRequest {
    /// Page loaded in the window.
    pub url: String,
    /// Window chrome kind.
    pub kind: WindowKind,
    /// Initial placement.
    pub geometry: WindowGeometry,
    /// Whether the page may close its own window.
    pub allow_scripts_to_close: bool,
}

/// Host window API consumed by the coordinator.
#[async_trait]
pub trait WindowPlatform: Send + Sync {
    /// Look up a window. Fails when the window no longer exists.
    async fn get(&self, id: WindowId) -> CoreResult<WindowInfo>;

    /// Create a window and return what the platform made of it.
    async fn create(&self, request: WindowRequest) -> CoreResult<WindowInfo>;

    /// Focus a window and ask the desktop to draw attention to it.
    async fn focus(&self, id: WindowId) -> CoreResult<()>;

    /// Close a window.
    async fn remove(&self, id: WindowId) -> CoreResult<()>;

    /// Available screen area, if the platform can tell.
    async fn screen_bounds(&self) -> CoreResult<ScreenBounds>;
}
