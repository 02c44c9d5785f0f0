//! Screen Recorder: tray-resident screen capture with a single recorder window.

mod app;
mod app_command;
mod config;
mod config_settings_store;
mod error;
mod file_previewer;
mod fs_downloader;
mod fs_store;
mod gif_encoder;
mod hotkey_handler;
mod page_host;
mod screen_capture;
mod tao_window_platform;
#[cfg(test)]
mod tests;
mod tray_icon_state;
mod tray_manager;
mod ui_bridge;
mod ui_event;
mod window_host;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    config_settings_store::ConfigSettingsStore,
    error::{AppError, Result as AppResult},
    file_previewer::FilePreviewer,
    fs_downloader::FsDownloader,
    fs_store::FsStore,
    gif_encoder::GifEncoderFactory,
    hotkey_handler::HotkeyHandler,
    page_host::WindowPageHost,
    screen_capture::{FrameHub, ScreenCapture},
    tao_window_platform::TaoWindowPlatform,
    tray_icon_state::TrayIconState,
    tray_manager::{TrayManager, TrayMenuIds},
    ui_bridge::UiBridge,
    ui_event::UiEvent,
    window_host::WindowHost,
};

use crate::config::Config;

use recorder_core::CoordinatorMessage;

use std::sync::Arc;

use global_hotkey::GlobalHotKeyManager;
use tao::{
    event::{Event, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopWindowTarget},
};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, error, warn};

/// Handle one [`UiEvent`] on the main thread.
///
/// Returns `true` when the event loop should exit.
fn handle_ui_event(
    event: UiEvent,
    target: &EventLoopWindowTarget<UiEvent>,
    windows: &mut WindowHost,
    tray_manager: &mut TrayManager,
) -> bool {
    match event {
        UiEvent::SetTrayState(state) => {
            if let Err(e) = tray_manager.update_state(state) {
                error!(error = ?e, "Failed to update tray icon");
            }
        }
        UiEvent::CreateWindow { request, reply } => {
            let _ = reply.send(windows.create(target, &request));
        }
        UiEvent::GetWindow { id, reply } => {
            let _ = reply.send(windows.get(id));
        }
        UiEvent::FocusWindow { id, reply } => {
            let _ = reply.send(windows.focus(id));
        }
        UiEvent::RemoveWindow { id, reply } => {
            let _ = reply.send(windows.remove(id));
        }
        UiEvent::ScreenBounds { reply } => {
            let _ = reply.send(WindowHost::screen_bounds(target));
        }
        UiEvent::SetWindowTitle { id, title } => {
            windows.set_title(id, &title);
        }
        UiEvent::Shutdown => return true,
    }
    false
}

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("screen_recorder=debug,recorder_core=debug")
        .init();

    let event_loop = EventLoopBuilder::<UiEvent>::with_user_event().build();
    let bridge = UiBridge::new(event_loop.create_proxy());

    // TrayManager and the windows live on the main thread - neither is Send.
    let mut tray_manager = match TrayManager::new() {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };
    let mut windows = WindowHost::default();

    // Window events are forwarded to the app before the runtime exists;
    // the receiver is handed over at Init.
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>(32);
    let mut command_rx = Some(command_rx);

    // Persists across event loop iterations; dropping it unregisters the hotkey.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;

    event_loop.run(move |event, target, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(ui_event) => {
                if handle_ui_event(ui_event, target, &mut windows, &mut tray_manager) {
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
                return;
            }
            Event::WindowEvent {
                window_id, event, ..
            } => {
                let Some(id) = windows.lookup(window_id) else {
                    return;
                };

                let message = match event {
                    WindowEvent::CloseRequested => {
                        windows.remove(id);
                        Some(CoordinatorMessage::WindowRemoved(id))
                    }
                    WindowEvent::Focused(true) => Some(CoordinatorMessage::FocusChanged(id)),
                    _ => None,
                };

                if let Some(message) = message {
                    if let Err(e) = command_tx.try_send(AppCommand::Coordinator(message)) {
                        warn!(window = %id, error = ?e, "Failed to forward window event");
                    }
                }
            }
            Event::NewEvents(StartCause::Init) => {
                let Some(command_rx) = command_rx.take() else {
                    debug!("Runtime already started");
                    return;
                };

                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let config = Arc::new(Mutex::new(config));
                let (shutdown_tx, shutdown_rx) = watch::channel(false);

                // Register hotkey on the main thread: tao's event loop pumps
                // the Windows messages needed for WM_HOTKEY delivery.
                let (manager, hotkey_id) = match HotkeyHandler::register_hotkey() {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("Failed to register hotkey: {:?}", e);
                        std::process::exit(1);
                    }
                };
                hotkey_manager = Some(manager);

                let bridge = bridge.clone();
                let exit_bridge = bridge.clone();
                let command_tx = command_tx.clone();
                let menu_ids = tray_manager.menu_ids().clone();

                // Spawn tokio runtime on separate thread.
                // Windows, tray and hotkey_manager stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let hotkey_handler = HotkeyHandler::new(hotkey_id, command_tx.clone());

                        let app = App {
                            bridge,
                            config,
                            command_tx,
                            command_rx,
                            shutdown_tx,
                            menu_ids,
                        };

                        tokio::join!(
                            async {
                                if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                                    error!(error = ?e, "Hotkey handler error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                    let _ = exit_bridge.send(UiEvent::Shutdown);
                                }
                            }
                        );
                    });
                });
            }
            _ => {}
        }

        // Keep hotkey_manager alive in the closure for the app's lifetime.
        let _ = &hotkey_manager;
    });
}
