use crate::{UiBridge, UiEvent};

use recorder_core::{
    CoreResult, RecorderError, ScreenBounds, WindowId, WindowInfo, WindowPlatform, WindowRequest,
};

use async_trait::async_trait;

/// [`WindowPlatform`] backed by tao windows on the main thread.
#[derive(Clone)]
pub struct TaoWindowPlatform {
    bridge: UiBridge,
}

impl TaoWindowPlatform {
    /// Platform posting through `bridge`.
    pub fn new(bridge: UiBridge) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl WindowPlatform for TaoWindowPlatform {
    async fn get(&self, id: WindowId) -> CoreResult<WindowInfo> {
        self.bridge
            .request(|reply| UiEvent::GetWindow { id, reply })
            .await
            .map_err(|e| e.into_platform("get window"))?
            .ok_or_else(|| RecorderError::platform("get window", format!("{id} is gone")))
    }

    async fn create(&self, request: WindowRequest) -> CoreResult<WindowInfo> {
        self.bridge
            .request(|reply| UiEvent::CreateWindow { request, reply })
            .await
            .and_then(|created| created)
            .map_err(|e| e.into_platform("create window"))
    }

    async fn focus(&self, id: WindowId) -> CoreResult<()> {
        let found = self
            .bridge
            .request(|reply| UiEvent::FocusWindow { id, reply })
            .await
            .map_err(|e| e.into_platform("focus window"))?;

        if found {
            Ok(())
        } else {
            Err(RecorderError::platform("focus window", format!("{id} is gone")))
        }
    }

    async fn remove(&self, id: WindowId) -> CoreResult<()> {
        let found = self
            .bridge
            .request(|reply| UiEvent::RemoveWindow { id, reply })
            .await
            .map_err(|e| e.into_platform("remove window"))?;

        if found {
            Ok(())
        } else {
            Err(RecorderError::platform("remove window", format!("{id} is gone")))
        }
    }

    async fn screen_bounds(&self) -> CoreResult<ScreenBounds> {
        self.bridge
            .request(|reply| UiEvent::ScreenBounds { reply })
            .await
            .map_err(|e| e.into_platform("screen bounds"))?
            .ok_or_else(|| RecorderError::platform("screen bounds", "no monitor reported"))
    }
}
