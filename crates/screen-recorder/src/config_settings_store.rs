use crate::config::Config;

use recorder_core::{CoreResult, Settings, SettingsStore, UiPreferences};

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

/// [`SettingsStore`] backed by the TOML configuration file.
#[derive(Clone)]
pub struct ConfigSettingsStore {
    config: Arc<Mutex<Config>>,
}

impl ConfigSettingsStore {
    /// Store over the shared configuration.
    pub fn new(config: Arc<Mutex<Config>>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SettingsStore for ConfigSettingsStore {
    async fn load_settings(&self) -> CoreResult<Option<Settings>> {
        Ok(Some(self.config.lock().await.recorder.clone()))
    }

    async fn save_settings(&self, settings: &Settings) -> CoreResult<()> {
        let mut config = self.config.lock().await;
        config.recorder = settings.clone();
        config.save().map_err(|e| e.into_platform("save settings"))
    }

    async fn load_preferences(&self) -> CoreResult<Option<UiPreferences>> {
        Ok(Some(self.config.lock().await.ui.preferences()))
    }

    async fn save_preferences(&self, preferences: &UiPreferences) -> CoreResult<()> {
        let mut config = self.config.lock().await;
        config.ui.apply(preferences);
        config.save().map_err(|e| e.into_platform("save preferences"))
    }
}
