use crate::{
    AppCommand, AppResult, ConfigSettingsStore, FilePreviewer, FrameHub, FsDownloader,
    FsStore, GifEncoderFactory, ScreenCapture, TaoWindowPlatform, TrayIconState,
    TrayMenuIds, UiBridge, UiEvent, WindowPageHost, config::Config,
};

use recorder_core::{
    CoordinatorMessage, PageCommand, PageHandle, PagePlatform, RecorderPage, RecorderView,
    WindowCoordinator, WindowId,
};

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{Mutex, mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::{
    MouseButton, MouseButtonState, TrayIconEvent,
    menu::{MenuEvent, MenuId},
};

const PAGE_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);
const PREVIEW_DIR: &str = "screen-recorder-previews";

/// Window title for a page view.
pub fn window_title(view: &RecorderView) -> String {
    if view.timer_running {
        format!("Screen Recorder - {} [{}]", view.status.text, view.timer_text)
    } else {
        format!("Screen Recorder - {}", view.status.text)
    }
}

struct OpenPage {
    window: WindowId,
    handle: PageHandle,
    task: JoinHandle<()>,
}

/// Main application state.
///
/// Runs on the async runtime thread. Talks to windows and the tray through
/// the [`UiBridge`] because both must remain on the UI thread.
pub struct App {
    pub(crate) bridge: UiBridge,
    pub(crate) config: Arc<Mutex<Config>>,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) menu_ids: TrayMenuIds,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Screen Recorder starting");

        let platform = self.page_platform().await?;
        let coordinator =
            WindowCoordinator::new(Arc::new(TaoWindowPlatform::new(self.bridge.clone())));
        let mut page: Option<OpenPage> = None;

        // Menu and icon events arrive on blocking crossbeam receivers.
        // Each forwarder exits on the first send after its receiver is dropped.
        let (menu_tx, mut menu_rx) = mpsc::channel(32);
        let menu_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if menu_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        let (icon_tx, mut icon_rx) = mpsc::channel(32);
        let icon_handle = tokio::task::spawn_blocking(move || {
            let receiver = TrayIconEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if icon_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        coordinator.handle(CoordinatorMessage::Startup).await;
        coordinator.handle(CoordinatorMessage::Activate).await;
        self.sync_page(&coordinator, &platform, &mut page).await;

        loop {
            tokio::select! {
                Some(event) = menu_rx.recv() => {
                    if let Some(command) = self.menu_command(&event) {
                        if let Err(e) = self.command_tx.send(command).await {
                            error!(error = ?e, "Failed to forward tray command");
                        }
                    }
                }

                Some(event) = icon_rx.recv() => {
                    if let TrayIconEvent::Click {
                        button: MouseButton::Left,
                        button_state: MouseButtonState::Up,
                        ..
                    } = event
                    {
                        coordinator.handle(CoordinatorMessage::Activate).await;
                        self.sync_page(&coordinator, &platform, &mut page).await;
                    }
                }

                Some(command) = self.command_rx.recv() => {
                    match command {
                        AppCommand::Coordinator(message) => {
                            coordinator.handle(message).await;
                            self.sync_page(&coordinator, &platform, &mut page).await;
                        }
                        AppCommand::ToggleRecording => {
                            self.send_to_page(&coordinator, &platform, &mut page, PageCommand::Toggle)
                                .await;
                        }
                        AppCommand::Page(command) => {
                            self.send_to_page(&coordinator, &platform, &mut page, command).await;
                        }
                        AppCommand::Shutdown => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        if let Some(open) = page.take() {
            close_page(open).await;
        }

        drop(menu_rx);
        drop(icon_rx);

        for (name, handle) in [("menu", menu_handle), ("icon", icon_handle)] {
            match tokio::time::timeout(Duration::from_secs(1), handle).await {
                Ok(Ok(())) => debug!(forwarder = name, "Tray event forwarder stopped cleanly"),
                Ok(Err(e)) => error!(forwarder = name, error = ?e, "Tray event forwarder panicked"),
                Err(_) => debug!(
                    forwarder = name,
                    "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
                ),
            }
        }

        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.bridge.send(UiEvent::Shutdown) {
            warn!(error = ?e, "Event loop already gone");
        }
        info!("Screen Recorder shut down successfully");

        Ok(())
    }

    /// Services shared by every recorder page. The host is filled in per window.
    async fn page_platform(&self) -> AppResult<PagePlatform> {
        let config = self.config.lock().await.clone();

        let frames = FrameHub::new();
        let recordings_dir = config.recordings_dir()?;
        let downloads_dir = config.downloads_dir()?;
        let preview_dir = std::env::temp_dir().join(PREVIEW_DIR);

        info!(
            recordings_dir = ?recordings_dir,
            downloads_dir = ?downloads_dir,
            "Storage configured"
        );

        Ok(PagePlatform {
            capture: Arc::new(ScreenCapture::new(frames.clone())),
            encoders: Arc::new(GifEncoderFactory::new(frames)),
            store: Arc::new(FsStore::new(recordings_dir)),
            downloader: Arc::new(FsDownloader::new(downloads_dir)),
            previewer: Arc::new(FilePreviewer::new(preview_dir, config.ui.auto_play)),
            settings: Arc::new(ConfigSettingsStore::new(Arc::clone(&self.config))),
            host: Arc::new(WindowPageHost::new(
                WindowId(0),
                self.bridge.clone(),
                self.command_tx.clone(),
            )),
        })
    }

    /// Keep exactly one page running for the coordinator's window.
    async fn sync_page(
        &self,
        coordinator: &WindowCoordinator,
        platform: &PagePlatform,
        page: &mut Option<OpenPage>,
    ) {
        let window = coordinator.window();
        if page.as_ref().map(|open| open.window) == window {
            return;
        }

        if let Some(open) = page.take() {
            close_page(open).await;
        }

        if let Some(window) = window {
            *page = Some(self.open_page(window, platform));
        }
    }

    fn open_page(&self, window: WindowId, shared: &PagePlatform) -> OpenPage {
        let platform = PagePlatform {
            host: Arc::new(WindowPageHost::new(
                window,
                self.bridge.clone(),
                self.command_tx.clone(),
            )),
            ..shared.clone()
        };

        let (recorder, handle) = RecorderPage::open(platform);
        let view_rx = handle.subscribe();
        let bridge = self.bridge.clone();

        let task = tokio::spawn(async move {
            let watcher = tokio::spawn(watch_view(window, view_rx, bridge));
            recorder.run().await;
            if let Err(e) = watcher.await {
                warn!(window = %window, error = ?e, "View watcher failed");
            }
        });

        info!(window = %window, "Recorder page opened");

        OpenPage {
            window,
            handle,
            task,
        }
    }

    async fn send_to_page(
        &self,
        coordinator: &WindowCoordinator,
        platform: &PagePlatform,
        page: &mut Option<OpenPage>,
        command: PageCommand,
    ) {
        if page.is_none() {
            debug!(?command, "No recorder window, opening one first");
            coordinator.handle(CoordinatorMessage::Activate).await;
            self.sync_page(coordinator, platform, page).await;
        }

        match page.as_ref() {
            Some(open) => {
                if let Err(e) = open.handle.send(command) {
                    warn!(window = %open.window, error = %e, "Recorder page gone");
                }
            }
            None => warn!(?command, "No recorder window available"),
        }
    }

    fn menu_command(&self, event: &MenuEvent) -> Option<AppCommand> {
        let ids = &self.menu_ids;
        let id = &event.id;

        if *id == ids.open {
            Some(AppCommand::Coordinator(CoordinatorMessage::Activate))
        } else if *id == ids.settings {
            open_settings();
            None
        } else if *id == ids.exit {
            info!("Exit requested from tray menu");
            Some(AppCommand::Shutdown)
        } else {
            page_command(ids, id).map(AppCommand::Page)
        }
    }
}

/// Page command behind a tray menu entry, if it has one.
pub fn page_command(ids: &TrayMenuIds, id: &MenuId) -> Option<PageCommand> {
    let command = if *id == ids.start {
        PageCommand::Start
    } else if *id == ids.stop {
        PageCommand::Stop
    } else if *id == ids.download {
        PageCommand::Download
    } else if *id == ids.download_latest {
        PageCommand::DownloadLatest
    } else if *id == ids.refresh_history {
        PageCommand::RefreshHistory
    } else if *id == ids.clear_history {
        PageCommand::ClearHistory
    } else if *id == ids.toggle_theme {
        PageCommand::ToggleTheme
    } else if *id == ids.minimal_mode {
        PageCommand::ToggleMinimalMode
    } else {
        return None;
    };
    Some(command)
}

fn open_settings() {
    match Config::config_path() {
        Ok(path) => match open::that(&path) {
            Ok(()) => info!(config_path = ?path, "Opened settings"),
            Err(e) => error!(error = ?e, "Failed to open settings"),
        },
        Err(e) => error!(error = ?e, "Config path unavailable"),
    }
}

async fn close_page(open: OpenPage) {
    let OpenPage {
        window,
        handle,
        task,
    } = open;

    if handle.send(PageCommand::Shutdown).is_err() {
        debug!(window = %window, "Recorder page already stopped");
    }

    match tokio::time::timeout(PAGE_SHUTDOWN_TIMEOUT, task).await {
        Ok(Ok(())) => info!(window = %window, "Recorder page stopped"),
        Ok(Err(e)) => error!(window = %window, error = ?e, "Recorder page task failed"),
        Err(_) => warn!(window = %window, "Recorder page did not stop in time"),
    }
}

/// Mirror a page's view into its window title and the tray icon.
async fn watch_view(window: WindowId, mut view_rx: watch::Receiver<RecorderView>, bridge: UiBridge) {
    let mut tray_state = None;

    loop {
        let (title, state) = {
            let view = view_rx.borrow_and_update();
            (window_title(&view), TrayIconState::for_phase(view.phase))
        };

        if let Err(e) = bridge.send(UiEvent::SetWindowTitle { id: window, title }) {
            debug!(error = ?e, "Title update dropped");
            break;
        }

        if tray_state != Some(state) {
            tray_state = Some(state);
            if let Err(e) = bridge.send(UiEvent::SetTrayState(state)) {
                debug!(error = ?e, "Tray update dropped");
                break;
            }
        }

        if view_rx.changed().await.is_err() {
            break;
        }
    }

    if tray_state.is_some_and(|state| state != TrayIconState::Idle) {
        let _ = bridge.send(UiEvent::SetTrayState(TrayIconState::Idle));
    }
}
