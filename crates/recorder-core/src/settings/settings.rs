use crate::settings::{default_codec, default_delay, default_resolution};

use serde::{Deserialize, Serialize};

/// Recording settings chosen by the user. Last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Resolution label such as `1920x1080`.
    #[serde(default = "default_resolution")]
    pub resolution: String,
    /// Codec label.
    #[serde(default = "default_codec")]
    pub codec: String,
    /// Countdown before recording, in whole seconds.
    #[serde(default = "default_delay")]
    pub delay: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            codec: default_codec(),
            delay: default_delay(),
        }
    }
}

/// Parse a `WIDTHxHEIGHT` label. Zero dimensions are rejected.
pub fn parse_resolution(label: &str) -> Option<(u32, u32)> {
    let (w, h) = label.trim().split_once(['x', 'X'])?;
    let width: u32 = w.trim().parse().ok()?;
    let height: u32 = h.trim().parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}
