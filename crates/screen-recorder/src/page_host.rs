use crate::{AppCommand, UiBridge, UiEvent};

use recorder_core::{CoordinatorMessage, CoreResult, PageHost, RecorderError, WindowId};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

/// [`PageHost`] for the page living in `window`.
pub struct WindowPageHost {
    window: WindowId,
    bridge: UiBridge,
    command_tx: mpsc::Sender<AppCommand>,
}

impl WindowPageHost {
    /// Host of the page in `window`.
    pub fn new(window: WindowId, bridge: UiBridge, command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self {
            window,
            bridge,
            command_tx,
        }
    }
}

#[async_trait]
impl PageHost for WindowPageHost {
    async fn request_reopen(&self) -> CoreResult<()> {
        self.command_tx
            .send(AppCommand::Coordinator(CoordinatorMessage::ReopenRequest))
            .await
            .map_err(|e| RecorderError::platform("request reopen", e.to_string()))
    }

    async fn close_window(&self) -> CoreResult<()> {
        let id = self.window;
        let existed = self
            .bridge
            .request(|reply| UiEvent::RemoveWindow { id, reply })
            .await
            .map_err(|e| e.into_platform("close window"))?;

        if existed {
            self.command_tx
                .send(AppCommand::Coordinator(CoordinatorMessage::WindowRemoved(id)))
                .await
                .map_err(|e| RecorderError::platform("close window", e.to_string()))?;
        } else {
            debug!(window = %id, "Window already closed");
        }
        Ok(())
    }
}
