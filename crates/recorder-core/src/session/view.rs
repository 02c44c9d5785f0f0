use crate::{
    history::HistoryListing,
    platform::PreviewUrl,
    session::{SessionState, TIMER_RESET_TEXT},
    settings::{Settings, UiPreferences},
};

/// Colour of the status dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Idle or informational.
    Ready,
    /// Encoder running.
    Recording,
    /// A recording just finished.
    Stopped,
}

/// Status dot plus status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Dot colour.
    pub kind: StatusKind,
    /// Status line.
    pub text: String,
}

impl Status {
    /// Informational status.
    pub fn ready(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Ready,
            text: text.into(),
        }
    }

    /// Recording status.
    pub fn recording(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Recording,
            text: text.into(),
        }
    }

    /// Finished status.
    pub fn stopped(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Stopped,
            text: text.into(),
        }
    }
}

/// Which controls accept input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// Start button.
    pub start: bool,
    /// Stop button.
    pub stop: bool,
    /// Resolution, codec, delay and save.
    pub settings: bool,
    /// History panel.
    pub history: bool,
    /// Download button.
    pub download: bool,
}

impl Controls {
    /// Controls for a session in `state`.
    pub fn for_state(state: SessionState, has_artifact: bool) -> Self {
        match state {
            SessionState::Idle => Self {
                start: true,
                stop: false,
                settings: true,
                history: true,
                download: has_artifact,
            },
            SessionState::Requesting { .. }
            | SessionState::Countdown { .. }
            | SessionState::Recording => Self {
                start: false,
                stop: true,
                settings: false,
                history: false,
                download: false,
            },
            SessionState::Finalizing => Self {
                start: false,
                stop: false,
                settings: false,
                history: false,
                download: false,
            },
        }
    }
}

/// Everything a host needs to render the recorder page.
#[derive(Debug, Clone, PartialEq)]
pub struct RecorderView {
    /// Session phase.
    pub phase: SessionState,
    /// Status dot and line.
    pub status: Status,
    /// `HH:MM:SS`.
    pub timer_text: String,
    /// Whether the timer is counting.
    pub timer_running: bool,
    /// Enabled controls.
    pub controls: Controls,
    /// Live capture preview shown.
    pub preview_visible: bool,
    /// Recorded-media player shown.
    pub player_visible: bool,
    /// Media loaded into the player.
    pub player_source: Option<PreviewUrl>,
    /// Current settings.
    pub settings: Settings,
    /// Current presentation preferences.
    pub preferences: UiPreferences,
    /// Last history listing, once requested.
    pub history: Option<HistoryListing>,
}

impl Default for RecorderView {
    fn default() -> Self {
        Self {
            phase: SessionState::Idle,
            status: Status::ready("Ready"),
            timer_text: TIMER_RESET_TEXT.to_string(),
            timer_running: false,
            controls: Controls::for_state(SessionState::Idle, false),
            preview_visible: true,
            player_visible: false,
            player_source: None,
            settings: Settings::default(),
            preferences: UiPreferences::default(),
            history: None,
        }
    }
}
