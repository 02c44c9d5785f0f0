use std::time::Duration;

use tokio::time::Instant;

/// Drops triggers arriving within `window` of the last accepted one.
#[derive(Debug, Clone)]
pub struct Debounce {
    window: Duration,
    last: Option<Instant>,
}

impl Debounce {
    /// Debounce with the given quiet period.
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Whether a trigger at `now` passes. Accepted triggers restart the period.
    pub fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last
            && now.saturating_duration_since(last) < self.window
        {
            return false;
        }
        self.last = Some(now);
        true
    }
}
