use crate::config::default_auto_play;

use recorder_core::{Theme, UiPreferences};
use serde::{Deserialize, Serialize};

/// Presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Colour theme.
    #[serde(default)]
    pub theme: Theme,
    /// Show only the essential controls.
    #[serde(default)]
    pub minimal_mode: bool,
    /// Open finished recordings in the system viewer.
    #[serde(default = "default_auto_play")]
    pub auto_play: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            minimal_mode: false,
            auto_play: default_auto_play(),
        }
    }
}

impl UiConfig {
    /// Preferences as the recorder page sees them.
    pub fn preferences(&self) -> UiPreferences {
        UiPreferences {
            theme: self.theme,
            minimal_mode: self.minimal_mode,
        }
    }

    /// Take over preferences changed on the page.
    pub fn apply(&mut self, preferences: &UiPreferences) {
        self.theme = preferences.theme;
        self.minimal_mode = preferences.minimal_mode;
    }
}
