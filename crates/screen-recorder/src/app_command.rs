use recorder_core::{CoordinatorMessage, PageCommand};

/// Commands sent to the main application from the hotkey, the tray and
/// recorder pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Signal for the window coordinator.
    Coordinator(CoordinatorMessage),
    /// Start or stop recording on the open page.
    ToggleRecording,
    /// Command for the open page.
    Page(PageCommand),
    /// Request application shutdown.
    Shutdown,
}
