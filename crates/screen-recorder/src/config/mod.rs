#[allow(clippy::module_inception)]
mod config;
mod storage_config;
mod ui_config;

pub(crate) use {config::Config, storage_config::StorageConfig, ui_config::UiConfig};

pub(crate) const DEFAULT_AUTO_PLAY: bool = true;

pub(crate) fn default_auto_play() -> bool {
    DEFAULT_AUTO_PLAY
}
