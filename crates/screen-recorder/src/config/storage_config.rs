use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where recordings and downloads go. Unset paths use platform defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the recording history.
    #[serde(default)]
    pub recordings_dir: Option<PathBuf>,
    /// Directory downloads are copied into.
    #[serde(default)]
    pub downloads_dir: Option<PathBuf>,
}
