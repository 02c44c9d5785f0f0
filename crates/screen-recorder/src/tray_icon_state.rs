use recorder_core::SessionState;

/// Tray icon states corresponding to application workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Ready to start recording.
    Idle,
    /// Waiting for capture permission or counting down.
    Countdown,
    /// Currently recording the screen.
    Recording,
    /// Finishing the recording.
    Processing,
}

impl TrayIconState {
    /// Icon for a session phase.
    pub fn for_phase(phase: SessionState) -> Self {
        match phase {
            SessionState::Idle => TrayIconState::Idle,
            SessionState::Requesting { .. } | SessionState::Countdown { .. } => {
                TrayIconState::Countdown
            }
            SessionState::Recording => TrayIconState::Recording,
            SessionState::Finalizing => TrayIconState::Processing,
        }
    }

    /// Tooltip shown next to the icon.
    pub fn tooltip(self) -> &'static str {
        match self {
            TrayIconState::Idle => "Screen Recorder - Ready",
            TrayIconState::Countdown => "Screen Recorder - Starting...",
            TrayIconState::Recording => "Screen Recorder - Recording...",
            TrayIconState::Processing => "Screen Recorder - Processing...",
        }
    }

    /// RGBA colour of the icon dot.
    pub fn color(self) -> [u8; 4] {
        match self {
            TrayIconState::Idle => [0x6b, 0x72, 0x80, 0xff],
            TrayIconState::Countdown => [0xf5, 0x9e, 0x0b, 0xff],
            TrayIconState::Recording => [0xdc, 0x26, 0x26, 0xff],
            TrayIconState::Processing => [0x25, 0x63, 0xeb, 0xff],
        }
    }
}
