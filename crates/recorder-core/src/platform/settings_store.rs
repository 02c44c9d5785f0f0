use crate::{
    CoreResult,
    settings::{Settings, UiPreferences},
};

use async_trait::async_trait;

/// Persists recorder settings and UI preferences.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Saved settings, or `None` when nothing was saved yet.
    async fn load_settings(&self) -> CoreResult<Option<Settings>>;

    /// Overwrite saved settings.
    async fn save_settings(&self, settings: &Settings) -> CoreResult<()>;

    /// Saved preferences, or `None` when nothing was saved yet.
    async fn load_preferences(&self) -> CoreResult<Option<UiPreferences>>;

    /// Overwrite saved preferences.
    async fn save_preferences(&self, preferences: &UiPreferences) -> CoreResult<()>;
}
