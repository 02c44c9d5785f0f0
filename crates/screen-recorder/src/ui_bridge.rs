//! Async side of the main-thread event loop.

use crate::{AppError, AppResult, UiEvent};

use std::{
    panic::Location,
    sync::{Arc, Mutex},
};

use error_location::ErrorLocation;
use tao::event_loop::EventLoopProxy;
use tokio::sync::oneshot;
use tracing::debug;

/// Posts [`UiEvent`]s to the tao event loop and awaits their replies.
#[derive(Clone)]
pub struct UiBridge {
    proxy: Arc<Mutex<EventLoopProxy<UiEvent>>>,
}

impl UiBridge {
    /// Bridge over `proxy`.
    pub fn new(proxy: EventLoopProxy<UiEvent>) -> Self {
        Self {
            proxy: Arc::new(Mutex::new(proxy)),
        }
    }

    /// Post an event without waiting.
    #[track_caller]
    pub fn send(&self, event: UiEvent) -> AppResult<()> {
        self.proxy
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .send_event(event)
            .map_err(|_| AppError::EventLoopClosed {
                reason: "event loop closed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Post the event built by `make` and wait for its reply.
    pub async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> UiEvent,
    ) -> AppResult<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(make(reply_tx))?;

        reply_rx.await.map_err(|_| {
            debug!("Event loop dropped a reply");
            AppError::EventLoopClosed {
                reason: "reply dropped".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
