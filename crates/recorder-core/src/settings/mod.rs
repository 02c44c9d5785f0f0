//! Recorder settings and UI preferences.

mod preferences;
#[allow(clippy::module_inception)]
mod settings;

pub use {
    preferences::{Theme, UiPreferences},
    settings::{Settings, parse_resolution},
};

pub(crate) const DEFAULT_RESOLUTION: &str = "1920x1080";
pub(crate) const DEFAULT_CODEC: &str = "vp9";
pub(crate) const DEFAULT_DELAY_SECS: u32 = 3;

pub(crate) fn default_resolution() -> String {
    DEFAULT_RESOLUTION.to_string()
}

pub(crate) fn default_codec() -> String {
    DEFAULT_CODEC.to_string()
}

pub(crate) fn default_delay() -> u32 {
    DEFAULT_DELAY_SECS
}
