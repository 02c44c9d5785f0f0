use serde::{Deserialize, Serialize};

/// Colour theme of the recorder page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background.
    #[default]
    Light,
    /// Dark background.
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Presentation preferences persisted beside the settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    /// Active theme.
    #[serde(default)]
    pub theme: Theme,
    /// Hide everything but the essential controls.
    #[serde(default)]
    pub minimal_mode: bool,
}
