use crate::{AppCommand, AppError, HotkeyHandler};

use recorder_core::{CoordinatorMessage, PageCommand};

use tokio::sync::mpsc;

/// WHAT: A hotkey press fails when the application channel is closed
/// WHY: The handler loop must stop instead of spinning on a dead receiver
#[tokio::test]
async fn given_closed_channel_when_hotkey_pressed_then_channel_send_fails() {
    // Given: A handler whose command receiver is gone
    let (command_tx, command_rx) = mpsc::channel(1);
    drop(command_rx);
    let handler = HotkeyHandler::new(7, command_tx);

    // When: The hotkey is pressed
    let result = handler.handle_hotkey_press().await;

    // Then: The press is reported as undeliverable
    assert!(matches!(result, Err(AppError::ChannelSendFailed { .. })));
}

/// WHAT: A hotkey press is delivered as a recording toggle
/// WHY: The same key starts and stops recording on the open page
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_open_channel_when_hotkey_pressed_then_toggle_is_delivered() {
    // Given: A handler with a live command channel
    let (command_tx, mut command_rx) = mpsc::channel(32);
    let handler = HotkeyHandler::new(7, command_tx);

    // When: The hotkey is pressed twice
    handler.handle_hotkey_press().await.unwrap();
    handler.handle_hotkey_press().await.unwrap();

    // Then: Two toggles arrive in order and nothing else
    assert_eq!(command_rx.recv().await.unwrap(), AppCommand::ToggleRecording);
    assert_eq!(command_rx.recv().await.unwrap(), AppCommand::ToggleRecording);
    assert!(command_rx.try_recv().is_err());
}

/// WHAT: Toggles and page commands stay distinguishable on the command channel
/// WHY: The app routes toggles through the page but coordinator messages around it
#[test]
fn given_app_commands_when_compared_then_variants_differ() {
    // Given: A toggle, a page start and a coordinator activation
    let toggle = AppCommand::ToggleRecording;
    let start = AppCommand::Page(PageCommand::Start);
    let activate = AppCommand::Coordinator(CoordinatorMessage::Activate);

    // When/Then: None of them compare equal
    assert_ne!(toggle, start);
    assert_ne!(start, activate);
    assert_ne!(toggle, activate);
}
