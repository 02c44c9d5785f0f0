//! Recorder windows owned by the main thread.
//!
//! `tao` windows must be created and touched on the thread running the event
//! loop. The async side reaches them through [`crate::UiBridge`].

use crate::{AppError, AppResult, UiEvent};

use recorder_core::{ScreenBounds, WindowId, WindowInfo, WindowKind, WindowRequest};

use std::{collections::HashMap, panic::Location};

use error_location::ErrorLocation;
use tao::{
    dpi::{LogicalPosition, LogicalSize},
    event_loop::EventLoopWindowTarget,
    window::{UserAttentionType, Window, WindowBuilder, WindowId as TaoWindowId},
};
use tracing::{debug, info, instrument};

const WINDOW_TITLE: &str = "Screen Recorder";

/// Open recorder windows keyed by the ids handed to the coordinator.
#[derive(Default)]
pub struct WindowHost {
    next_id: u64,
    windows: HashMap<WindowId, Window>,
    by_tao: HashMap<TaoWindowId, WindowId>,
}

impl WindowHost {
    /// Open a window for `request`.
    #[track_caller]
    #[instrument(skip(self, target))]
    pub fn create(
        &mut self,
        target: &EventLoopWindowTarget<UiEvent>,
        request: &WindowRequest,
    ) -> AppResult<WindowInfo> {
        let geometry = request.geometry;

        let window = WindowBuilder::new()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(geometry.width, geometry.height))
            .with_position(LogicalPosition::new(geometry.left, geometry.top))
            .with_resizable(true)
            .build(target)
            .map_err(|e| AppError::WindowError {
                reason: format!("Failed to create window: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.next_id += 1;
        let id = WindowId(self.next_id);

        self.by_tao.insert(window.id(), id);
        self.windows.insert(id, window);

        info!(window = %id, url = %request.url, "Window opened");

        Ok(WindowInfo {
            id,
            kind: WindowKind::Popup,
            incognito: false,
        })
    }

    /// Info about an open window.
    pub fn get(&self, id: WindowId) -> Option<WindowInfo> {
        self.windows.contains_key(&id).then_some(WindowInfo {
            id,
            kind: WindowKind::Popup,
            incognito: false,
        })
    }

    /// Focus a window and request the user's attention.
    pub fn focus(&self, id: WindowId) -> bool {
        match self.windows.get(&id) {
            Some(window) => {
                window.set_visible(true);
                window.set_minimized(false);
                window.set_focus();
                window.request_user_attention(Some(UserAttentionType::Informational));
                true
            }
            None => false,
        }
    }

    /// Close a window. Dropping a tao window closes it.
    pub fn remove(&mut self, id: WindowId) -> bool {
        match self.windows.remove(&id) {
            Some(window) => {
                self.by_tao.remove(&window.id());
                debug!(window = %id, "Window closed");
                true
            }
            None => false,
        }
    }

    /// Coordinator id of a tao window.
    pub fn lookup(&self, tao_id: TaoWindowId) -> Option<WindowId> {
        self.by_tao.get(&tao_id).copied()
    }

    /// Render a title into a window.
    pub fn set_title(&self, id: WindowId, title: &str) {
        if let Some(window) = self.windows.get(&id) {
            window.set_title(title);
        }
    }

    /// Logical size of the primary monitor.
    pub fn screen_bounds(target: &EventLoopWindowTarget<UiEvent>) -> Option<ScreenBounds> {
        let monitor = target
            .primary_monitor()
            .or_else(|| target.available_monitors().next())?;
        let size: LogicalSize<u32> = monitor.size().to_logical(monitor.scale_factor());

        Some(ScreenBounds {
            width: size.width,
            height: size.height,
        })
    }
}
