//! System tray icon with state-based updates.
//!
//! Manages a system tray icon with one colour per recording phase and a
//! context menu driving the recorder window.

use crate::{AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use image::{Rgba, RgbaImage};
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const ICON_SIZE: u32 = 32;

/// Ids of the tray menu entries.
#[derive(Debug, Clone)]
pub struct TrayMenuIds {
    /// Open or focus the recorder window.
    pub open: MenuId,
    /// Start recording.
    pub start: MenuId,
    /// Stop recording.
    pub stop: MenuId,
    /// Download the recording in the player.
    pub download: MenuId,
    /// Download the newest recording.
    pub download_latest: MenuId,
    /// Reload the history listing.
    pub refresh_history: MenuId,
    /// Delete every recording.
    pub clear_history: MenuId,
    /// Switch between light and dark.
    pub toggle_theme: MenuId,
    /// Switch minimal mode.
    pub minimal_mode: MenuId,
    /// Open the configuration file.
    pub settings: MenuId,
    /// Quit.
    pub exit: MenuId,
}

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    menu_ids: TrayMenuIds,
}

impl TrayManager {
    /// Create a new tray manager with initial state.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let open = MenuItem::new("Open Recorder", true, None);
        let start = MenuItem::new("Start Recording", true, None);
        let stop = MenuItem::new("Stop Recording", true, None);
        let download = MenuItem::new("Download Recording", true, None);
        let download_latest = MenuItem::new("Download Latest", true, None);
        let refresh_history = MenuItem::new("Refresh History", true, None);
        let clear_history = MenuItem::new("Clear History", true, None);
        let toggle_theme = MenuItem::new("Toggle Theme", true, None);
        let minimal_mode = MenuItem::new("Minimal Mode", true, None);
        let settings = MenuItem::new("Settings", true, None);
        let exit = MenuItem::new("Exit", true, None);

        let menu_ids = TrayMenuIds {
            open: open.id().clone(),
            start: start.id().clone(),
            stop: stop.id().clone(),
            download: download.id().clone(),
            download_latest: download_latest.id().clone(),
            refresh_history: refresh_history.id().clone(),
            clear_history: clear_history.id().clone(),
            toggle_theme: toggle_theme.id().clone(),
            minimal_mode: minimal_mode.id().clone(),
            settings: settings.id().clone(),
            exit: exit.id().clone(),
        };

        let separator = PredefinedMenuItem::separator();
        menu.append_items(&[
            &open,
            &separator,
            &start,
            &stop,
            &download,
            &download_latest,
            &refresh_history,
            &clear_history,
            &PredefinedMenuItem::separator(),
            &toggle_theme,
            &minimal_mode,
            &settings,
            &exit,
        ])
        .map_err(|e| AppError::TrayError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let icon = Self::load_icon(TrayIconState::Idle)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(TrayIconState::Idle.tooltip())
            .with_menu(Box::new(menu))
            .with_menu_on_left_click(false)
            .with_icon(icon)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            menu_ids,
        })
    }

    /// Update the tray icon state with new icon and tooltip.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        let icon = Self::load_icon(state)?;

        self.tray_icon
            .set_icon(Some(icon))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(state.tooltip()))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Ids of the menu entries.
    pub fn menu_ids(&self) -> &TrayMenuIds {
        &self.menu_ids
    }

    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let rgba = icon_image(state);
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Filled dot in the state's colour on a transparent square.
pub fn icon_image(state: TrayIconState) -> RgbaImage {
    let center = (ICON_SIZE as f32 - 1.0) / 2.0;
    let radius = ICON_SIZE as f32 / 2.0 - 2.0;
    let color = Rgba(state.color());

    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        if dx * dx + dy * dy <= radius * radius {
            color
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}
