use std::time::Duration;

use tokio::time::Instant;

/// Timer text shown when no recording is running.
pub const TIMER_RESET_TEXT: &str = "00:00:00";

/// Format whole elapsed seconds as `HH:MM:SS`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Wall-clock timer for the recording phase.
#[derive(Debug, Default)]
pub struct RecordingTimer {
    started_at: Option<Instant>,
    text: Option<String>,
}

impl RecordingTimer {
    /// Start counting from zero.
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
        self.text = Some(format_elapsed(Duration::ZERO));
    }

    /// Freeze the displayed value.
    pub fn stop(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.text = Some(format_elapsed(started_at.elapsed()));
        }
    }

    /// Stop and show `00:00:00`.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.text = None;
    }

    /// Whether the timer is counting.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Current display text.
    pub fn text(&self) -> String {
        match (self.started_at, &self.text) {
            (Some(started_at), _) => format_elapsed(started_at.elapsed()),
            (None, Some(frozen)) => frozen.clone(),
            (None, None) => TIMER_RESET_TEXT.to_string(),
        }
    }
}
