use crate::{
    best_effort,
    coordinator::{
        ACTIVATION_DEBOUNCE, CoordinatorMessage, Debounce, RECORDER_HEIGHT, RECORDER_URL,
        RECORDER_WIDTH, centered_geometry,
    },
    platform::{WindowId, WindowKind, WindowPlatform, WindowRequest},
};

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
struct CoordinatorState {
    window: Option<WindowId>,
    creation_in_flight: bool,
    debounce: Debounce,
}

/// Releases the creation flag on every exit path.
struct CreationGuard {
    state: Arc<Mutex<CoordinatorState>>,
}

impl CreationGuard {
    fn acquire(state: &Arc<Mutex<CoordinatorState>>) -> Option<Self> {
        let mut locked = state.lock().unwrap_or_else(|e| e.into_inner());
        if locked.creation_in_flight {
            return None;
        }
        locked.creation_in_flight = true;
        Some(Self {
            state: Arc::clone(state),
        })
    }
}

impl Drop for CreationGuard {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .creation_in_flight = false;
    }
}

/// Keeps at most one recorder window alive.
///
/// Cheap to clone; clones share state so concurrently running handlers see
/// the same window and the same creation flag. Platform failures never
/// escape: a window that cannot be queried is treated as gone.
#[derive(Clone)]
pub struct WindowCoordinator {
    platform: Arc<dyn WindowPlatform>,
    state: Arc<Mutex<CoordinatorState>>,
}

impl WindowCoordinator {
    /// Coordinator over `platform`, tracking no window.
    pub fn new(platform: Arc<dyn WindowPlatform>) -> Self {
        Self {
            platform,
            state: Arc::new(Mutex::new(CoordinatorState {
                window: None,
                creation_in_flight: false,
                debounce: Debounce::new(ACTIVATION_DEBOUNCE),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Currently tracked window.
    pub fn window(&self) -> Option<WindowId> {
        self.lock().window
    }

    /// Whether a window creation is in progress.
    pub fn is_creating(&self) -> bool {
        self.lock().creation_in_flight
    }

    /// Dispatch an inbound signal. Activations are debounced.
    #[instrument(skip(self))]
    pub async fn handle(&self, message: CoordinatorMessage) {
        match message {
            CoordinatorMessage::Startup => self.on_startup(),
            CoordinatorMessage::Activate => {
                let accepted = self.lock().debounce.accept(Instant::now());
                if accepted {
                    self.activate().await;
                } else {
                    debug!("Activation debounced");
                }
            }
            CoordinatorMessage::ReopenRequest => self.on_reopen_request().await,
            CoordinatorMessage::WindowRemoved(id) => self.on_window_removed(id),
            CoordinatorMessage::FocusChanged(id) => self.on_focus_changed(id).await,
        }
    }

    /// Focus the tracked window, or create one if it is missing or unusable.
    #[instrument(skip(self))]
    pub async fn activate(&self) {
        let current = self.window();

        if let Some(id) = current {
            if self.is_valid(id).await {
                match self.platform.focus(id).await {
                    Ok(()) => {
                        debug!(window = %id, "Recorder window focused");
                        return;
                    }
                    Err(e) => warn!(window = %id, error = %e, "Failed to focus recorder window"),
                }
            }
            self.forget(id).await;
        }

        self.create_window().await;
    }

    /// Create the recorder window unless a creation is already running.
    #[instrument(skip(self))]
    pub async fn create_window(&self) {
        let Some(_guard) = CreationGuard::acquire(&self.state) else {
            debug!("Window creation already in progress, request dropped");
            return;
        };

        let stale = self.lock().window.take();
        if let Some(stale) = stale {
            best_effort(self.platform.remove(stale).await, "remove stale window");
        }

        let bounds = best_effort(self.platform.screen_bounds().await, "screen bounds");
        let geometry = centered_geometry(bounds, RECORDER_WIDTH, RECORDER_HEIGHT);

        let request = WindowRequest {
            url: RECORDER_URL.to_string(),
            kind: WindowKind::Popup,
            geometry,
            allow_scripts_to_close: true,
        };

        let Some(info) = best_effort(self.platform.create(request).await, "create window") else {
            return;
        };

        self.lock().window = Some(info.id);

        if self.is_valid(info.id).await {
            info!(
                window = %info.id,
                left = geometry.left,
                top = geometry.top,
                "Recorder window created"
            );
        } else {
            warn!(window = %info.id, "Created window failed validation");
            self.forget(info.id).await;
        }
    }

    /// Forget `id` if it is the tracked window.
    #[instrument(skip(self))]
    pub fn on_window_removed(&self, id: WindowId) {
        if self.clear_if(id) {
            info!(window = %id, "Recorder window closed");
        }
    }

    /// Re-validate `id` if it is the tracked window.
    #[instrument(skip(self))]
    pub async fn on_focus_changed(&self, id: WindowId) {
        if self.window() != Some(id) {
            return;
        }
        if !self.is_valid(id).await {
            warn!(window = %id, "Focused window failed validation");
            self.forget(id).await;
        }
    }

    /// Replace the tracked window with a fresh one.
    #[instrument(skip(self))]
    pub async fn on_reopen_request(&self) {
        let old = self.lock().window.take();
        if let Some(old) = old {
            best_effort(self.platform.remove(old).await, "remove window before reopen");
        }
        self.create_window().await;
    }

    /// Drop whatever a previous run left behind.
    pub fn on_startup(&self) {
        if let Some(stale) = self.lock().window.take() {
            debug!(window = %stale, "Cleared stale window handle on startup");
        }
    }

    async fn is_valid(&self, id: WindowId) -> bool {
        match self.platform.get(id).await {
            Ok(info) => !info.incognito && info.kind == WindowKind::Popup,
            Err(e) => {
                debug!(window = %id, error = %e, "Window lookup failed");
                false
            }
        }
    }

    async fn forget(&self, id: WindowId) {
        self.clear_if(id);
        best_effort(self.platform.remove(id).await, "remove invalid window");
    }

    fn clear_if(&self, id: WindowId) -> bool {
        let mut state = self.lock();
        if state.window == Some(id) {
            state.window = None;
            true
        } else {
            false
        }
    }
}
