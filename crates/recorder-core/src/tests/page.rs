use crate::{
    DownloadState, EncoderEvent, EncoderState, HistoryListing, PageCommand, PageMessage,
    RecordId, RecorderPage, RecordingStore, SessionState, Settings, StatusKind, TIMER_RESET_TEXT,
    Theme, TrackId,
    tests::fakes::{CaptureMode, FailingStore, FakeEncoderFactory, PageFakes, artifact},
};

use std::{sync::Arc, time::Duration};

async fn open(fakes: &PageFakes) -> RecorderPage {
    let (mut page, _handle) = RecorderPage::open(fakes.platform());
    page.initialize().await;
    page
}

async fn command(page: &mut RecorderPage, command: PageCommand) {
    page.dispatch(PageMessage::Command(command)).await;
    page.settle().await;
}

/// Start with no delay and wait until the encoder runs.
async fn recording(fakes: &PageFakes) -> RecorderPage {
    let mut page = open(fakes).await;
    command(&mut page, PageCommand::Start).await;
    assert_eq!(page.state(), SessionState::Recording);
    page
}

fn assert_cleaned(page: &RecorderPage) {
    assert_eq!(page.state(), SessionState::Idle);
    assert_eq!(page.encoder_state(), EncoderState::Inactive);
    assert_eq!(page.track_count(), 0);
    assert_eq!(page.chunk_count(), 0);
    assert!(!page.has_artifact());
    assert!(!page.countdown_pending());
    assert_eq!(page.view().timer_text, TIMER_RESET_TEXT);
    assert!(page.view().preview_visible);
    assert!(!page.view().player_visible);
    assert!(!page.view().controls.download);
}

/// WHAT: A fresh page loads saved settings and shows Ready
/// WHY: Settings are read once at page start
#[tokio::test]
async fn given_saved_settings_when_page_opens_then_settings_loaded_and_ready() {
    // Given: Saved settings with a 7 second delay
    let fakes = PageFakes::new(7);

    // When: The page initializes
    let page = open(&fakes).await;

    // Then: Settings are applied and the page is ready
    assert_eq!(page.settings().delay, 7);
    assert_eq!(page.view().status.text, "Ready");
    assert!(page.view().controls.start);
    assert!(!page.view().controls.stop);
}

/// WHAT: Zero delay starts the encoder right after the stream arrives
/// WHY: No countdown may run when the delay is zero
#[tokio::test(start_paused = true)]
async fn given_zero_delay_when_started_then_recording_without_countdown() {
    // Given: A page with no delay
    let fakes = PageFakes::new(0);

    // When: Recording starts
    let page = recording(&fakes).await;

    // Then: The encoder runs with the table bitrate and the view shows recording
    let config = fakes.encoders.last_config().unwrap();
    assert_eq!(config.bits_per_second, 16_000_000);
    assert_eq!(config.mime_type, "video/webm");
    assert_eq!(page.view().status.kind, StatusKind::Recording);
    assert_eq!(page.view().status.text, "Recording...");
    assert!(page.view().timer_running);
    assert!(page.view().controls.stop);
    assert!(!page.view().controls.settings);

    let requests = fakes.capture.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].frame_rate, 60);
    assert_eq!(requests[0].ideal_width, Some(1920));
    assert!(requests[0].echo_cancellation);
}

/// WHAT: Stopping a recording with data stores exactly one record
/// WHY: The stored size must equal the concatenated chunk length
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_recorded_chunks_when_stopped_then_one_record_of_concatenated_size() {
    // Given: A recording that produced two chunks
    let fakes = PageFakes::new(0);
    let mut page = recording(&fakes).await;
    fakes
        .encoders
        .emit(EncoderEvent::DataAvailable(vec![0u8; 10]));
    fakes.encoders.emit(EncoderEvent::DataAvailable(vec![0u8; 5]));
    page.settle().await;
    assert_eq!(page.chunk_count(), 2);

    // When: The user stops
    command(&mut page, PageCommand::Stop).await;

    // Then: One record holds the two chunks plus the flushed one
    let stored = fakes.store.get_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].artifact.size, 18);
    assert!(
        stored[0]
            .artifact
            .filename
            .starts_with("screen-recording-1920x1080-")
    );
    assert!(stored[0].artifact.filename.ends_with(".webm"));

    // Then: The player shows the recording and the session is released
    assert_eq!(page.state(), SessionState::Idle);
    assert_eq!(page.view().status.text, "Recording complete");
    assert_eq!(page.view().status.kind, StatusKind::Stopped);
    assert!(page.view().player_visible);
    assert!(page.view().controls.download);
    assert!(page.has_artifact());
    assert_eq!(page.chunk_count(), 0);
    assert_eq!(page.track_count(), 0);
    assert_eq!(page.view().timer_text, TIMER_RESET_TEXT);
    assert_eq!(fakes.previewer.created(), 1);
    assert_eq!(fakes.previewer.played(), 1);
}

/// WHAT: Finalizing with no chunks fails and stores nothing
/// WHY: An empty recording must never reach history
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_no_chunks_when_finalized_then_failure_and_nothing_stored() {
    // Given: An encoder that never produces data
    let fakes = PageFakes::with(CaptureMode::Grant, FakeEncoderFactory::silent(), 0);
    let mut page = recording(&fakes).await;

    // When: The user stops
    command(&mut page, PageCommand::Stop).await;

    // Then: Nothing is stored and the failure is shown
    assert!(fakes.store.get_all().await.unwrap().is_empty());
    assert_eq!(page.view().status.text, "Recording failed");
    assert_cleaned(&page);
}

/// WHAT: An encoder that fails and cannot stop still ends the session
/// WHY: Its worker is gone, so no Stopped event will ever unlock the controls
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_dead_encoder_when_it_fails_then_idle_with_controls_enabled() {
    // Given: A recording whose encoder rejects flush and stop
    let fakes = PageFakes::with(CaptureMode::Grant, FakeEncoderFactory::broken(), 0);
    let mut page = recording(&fakes).await;

    // When: The encoder reports a failure
    fakes
        .encoders
        .emit(EncoderEvent::Failed("write error".to_string()));
    page.settle().await;

    // Then: The session is over and can be restarted
    assert_eq!(fakes.encoders.stops(), 1);
    assert!(fakes.store.get_all().await.unwrap().is_empty());
    assert_eq!(page.view().status.text, "Recording failed");
    assert!(page.view().controls.start);
    assert!(!page.view().controls.stop);
    assert_cleaned(&page);

    // When: Time passes and the user presses stop anyway
    tokio::time::sleep(Duration::from_secs(60)).await;
    command(&mut page, PageCommand::Stop).await;

    // Then: Nothing changes
    assert_eq!(page.state(), SessionState::Idle);
    assert!(page.view().controls.start);
}

/// WHAT: Stopping a recording whose encoder cannot stop keeps the chunks so far
/// WHY: Finalizing must not wait for an event that will never come
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_dead_encoder_with_chunks_when_stopped_then_recording_saved() {
    // Given: A recording that delivered one chunk before its encoder died
    let fakes = PageFakes::with(CaptureMode::Grant, FakeEncoderFactory::broken(), 0);
    let mut page = recording(&fakes).await;
    fakes.encoders.emit(EncoderEvent::DataAvailable(vec![7u8; 4]));
    page.settle().await;

    // When: The user stops
    command(&mut page, PageCommand::Stop).await;

    // Then: The chunk is stored and the page is idle again
    let stored = fakes.store.get_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].artifact.size, 4);
    assert_eq!(page.state(), SessionState::Idle);
    assert_eq!(page.view().status.text, "Recording complete");
    assert!(page.view().controls.start);
    assert_eq!(page.track_count(), 0);
}

/// WHAT: Permission refusal relaunches the window instead of retrying
/// WHY: A refused request cannot be retried from the same page
#[tokio::test(start_paused = true)]
async fn given_permission_denied_when_starting_then_reopen_requested_and_window_closed() {
    // Given: A user who refuses capture
    let fakes = PageFakes::with(CaptureMode::Deny, FakeEncoderFactory::new(), 3);
    let mut page = open(&fakes).await;

    // When: Recording starts
    command(&mut page, PageCommand::Start).await;

    // Then: A fresh window is requested and this one closed
    assert_eq!(fakes.host.reopens(), 1);
    assert_eq!(fakes.host.closes(), 1);
    assert_eq!(fakes.encoders.created(), 0);
    assert_eq!(
        page.view().status.text,
        "Permission denied - please allow screen sharing"
    );
    assert_cleaned(&page);
}

/// WHAT: Other capture failures abort to idle without a relaunch
/// WHY: Only permission refusal relaunches the window
#[tokio::test(start_paused = true)]
async fn given_capture_failure_when_starting_then_idle_with_failure_status() {
    // Given: A capture source that fails
    let fakes = PageFakes::with(CaptureMode::Fail, FakeEncoderFactory::new(), 0);
    let mut page = open(&fakes).await;

    // When: Recording starts
    command(&mut page, PageCommand::Start).await;

    // Then: The page is idle and nothing was relaunched
    assert_eq!(fakes.host.reopens(), 0);
    assert_eq!(page.view().status.text, "Failed to start recording");
    assert_cleaned(&page);
}

/// WHAT: A track ending at tick three of a five second countdown aborts it
/// WHY: The encoder must never start once the user stopped sharing
#[tokio::test(start_paused = true)]
async fn given_five_second_delay_when_track_ends_at_tick_three_then_idle_without_recording() {
    // Given: A countdown of five seconds
    let fakes = PageFakes::new(5);
    let mut page = open(&fakes).await;
    command(&mut page, PageCommand::Start).await;
    assert_eq!(page.state(), SessionState::Countdown { remaining: 5 });
    assert_eq!(page.view().status.text, "Starting in 5 seconds...");

    // When: Two seconds pass and the user stops sharing
    assert!(page.step().await);
    assert!(page.step().await);
    assert_eq!(page.state(), SessionState::Countdown { remaining: 3 });
    fakes.capture.end_track(TrackId(1));
    page.settle().await;

    // Then: The session is idle and never recorded
    assert_eq!(fakes.encoders.created(), 0);
    assert_eq!(page.view().status.text, "Stream ended by user");
    assert_cleaned(&page);
    let stream = fakes.capture.stream();
    let stopped = stream.lock().unwrap_or_else(|e| e.into_inner()).stopped.len();
    assert!(stopped > 0);
}

/// WHAT: A countdown that runs out starts the encoder
/// WHY: Delay N must tick N times before recording
#[tokio::test(start_paused = true)]
async fn given_two_second_delay_when_countdown_completes_then_recording() {
    // Given: A two second countdown
    let fakes = PageFakes::new(2);
    let mut page = open(&fakes).await;
    command(&mut page, PageCommand::Start).await;

    // When: Both ticks pass
    assert!(page.step().await);
    assert_eq!(page.state(), SessionState::Countdown { remaining: 1 });
    assert!(page.step().await);
    page.settle().await;

    // Then: The encoder is running
    assert_eq!(page.state(), SessionState::Recording);
    assert_eq!(fakes.encoders.created(), 1);
    assert_eq!(page.encoder_state(), EncoderState::Recording);
}

/// WHAT: Stop during countdown cancels the pending tick
/// WHY: A cancelled countdown must never start the encoder later
#[tokio::test(start_paused = true)]
async fn given_countdown_when_stopped_then_cancelled_and_tick_cleared() {
    // Given: A running countdown
    let fakes = PageFakes::new(3);
    let mut page = open(&fakes).await;
    command(&mut page, PageCommand::Start).await;

    // When: The user stops and time passes
    command(&mut page, PageCommand::Stop).await;
    tokio::time::advance(Duration::from_secs(5)).await;
    page.settle().await;

    // Then: The countdown is gone and nothing recorded
    assert_eq!(page.view().status.text, "Countdown cancelled");
    assert_eq!(fakes.encoders.created(), 0);
    assert_cleaned(&page);
}

/// WHAT: A stop during the capture request releases the stream on arrival
/// WHY: The request cannot be cancelled, so its stream must not leak
#[tokio::test(start_paused = true)]
async fn given_pending_request_when_stopped_then_stream_released_on_arrival() {
    // Given: A start whose capture request is still pending
    let fakes = PageFakes::new(0);
    let mut page = open(&fakes).await;
    page.dispatch(PageMessage::Command(PageCommand::Start)).await;

    // When: Stop arrives before the stream
    page.dispatch(PageMessage::Command(PageCommand::Stop)).await;
    assert!(matches!(
        page.state(),
        SessionState::Requesting {
            cancel_requested: true,
            ..
        }
    ));
    page.settle().await;

    // Then: The stream is stopped and detached, nothing recorded
    let stream = fakes.capture.stream();
    let stream = stream.lock().unwrap_or_else(|e| e.into_inner());
    assert_eq!(stream.stopped.len(), 2);
    assert!(stream.tracks.is_empty());
    drop(stream);
    assert_eq!(fakes.encoders.created(), 0);
    assert_eq!(page.view().status.text, "Recording cancelled");
    assert_cleaned(&page);
}

/// WHAT: Cleanup leaves the same idle state from every phase
/// WHY: Cleanup is the single convergence point of all stop paths
#[tokio::test(start_paused = true)]
async fn given_any_state_when_cleaned_up_then_resources_released() {
    // Given: A page in countdown
    let fakes = PageFakes::new(3);
    let mut page = open(&fakes).await;
    command(&mut page, PageCommand::Start).await;

    // When: Cleaning up twice
    page.cleanup();
    page.cleanup();

    // Then: Everything is released
    assert_cleaned(&page);

    // Given: A page recording with buffered chunks
    let fakes = PageFakes::new(0);
    let mut page = recording(&fakes).await;
    fakes.encoders.emit(EncoderEvent::DataAvailable(vec![9u8; 4]));
    page.settle().await;

    // When: Cleaning up
    page.cleanup();

    // Then: The encoder was stopped and everything released
    assert_eq!(fakes.encoders.stops(), 1);
    assert_cleaned(&page);
}

/// WHAT: Cleanup after a finished recording revokes the preview handle
/// WHY: Preview handles must not outlive the cached artifact
#[tokio::test(start_paused = true)]
async fn given_finished_recording_when_cleaned_up_then_preview_revoked() {
    // Given: A finished recording in the player
    let fakes = PageFakes::new(0);
    let mut page = recording(&fakes).await;
    command(&mut page, PageCommand::Stop).await;
    assert!(page.has_artifact());

    // When: Cleaning up
    page.cleanup();

    // Then: The preview is revoked
    assert_eq!(fakes.previewer.revoked().len(), 1);
    assert_cleaned(&page);
}

/// WHAT: Stop while idle is a no-op, however often it is sent
/// WHY: Stop must be idempotent
#[tokio::test]
async fn given_idle_page_when_stopped_repeatedly_then_nothing_happens() {
    // Given: An idle page
    let fakes = PageFakes::new(0);
    let mut page = open(&fakes).await;

    // When: Stop arrives three times
    for _ in 0..3 {
        command(&mut page, PageCommand::Stop).await;
    }

    // Then: Nothing was requested and the page is still ready
    assert!(fakes.capture.requests().is_empty());
    assert_eq!(page.view().status.text, "Ready");
    assert_eq!(page.state(), SessionState::Idle);
}

/// WHAT: Completions of a released session are ignored
/// WHY: Late encoder data must never leak into the next session
#[tokio::test(start_paused = true)]
async fn given_released_session_when_late_chunk_arrives_then_discarded() {
    // Given: A recording that was cleaned up
    let fakes = PageFakes::new(0);
    let mut page = recording(&fakes).await;
    let old_session = page.session_id();
    page.cleanup();
    assert_ne!(page.session_id(), old_session);

    // When: The old encoder posts data
    fakes.encoders.emit(EncoderEvent::DataAvailable(vec![1u8; 8]));
    page.settle().await;

    // Then: It is dropped
    assert_eq!(page.chunk_count(), 0);
    assert_eq!(page.state(), SessionState::Idle);
}

/// WHAT: The toggle command starts when idle and stops otherwise
/// WHY: The global hotkey maps to a single toggle
#[tokio::test(start_paused = true)]
async fn given_toggle_when_idle_then_starts_and_when_recording_then_stops() {
    // Given: An idle page with no delay
    let fakes = PageFakes::new(0);
    let mut page = open(&fakes).await;

    // When: Toggling twice
    command(&mut page, PageCommand::Toggle).await;
    let after_first = page.state();
    command(&mut page, PageCommand::Toggle).await;

    // Then: It recorded and then finished
    assert_eq!(after_first, SessionState::Recording);
    assert_eq!(page.state(), SessionState::Idle);
    assert_eq!(page.view().status.text, "Recording complete");
}

/// WHAT: Downloads report their terminal state in the status line
/// WHY: Users must see whether the file was saved
#[tokio::test(start_paused = true)]
async fn given_finished_recording_when_downloaded_then_progress_reported() {
    // Given: A finished recording
    let fakes = PageFakes::new(0);
    let mut page = recording(&fakes).await;
    command(&mut page, PageCommand::Stop).await;

    // When: Downloading
    command(&mut page, PageCommand::Download).await;

    // Then: The download was started with save-as
    let requests = fakes.downloader.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].save_as);
    assert_eq!(requests[0].size, 3);
    assert_eq!(page.view().status.text, "Starting download...");

    // When: The download completes
    fakes
        .downloader
        .finish(requests[0].id, DownloadState::Complete);
    page.settle().await;

    // Then: Completion is reported and the record was not saved twice
    assert_eq!(page.view().status.text, "Download completed");
    assert_eq!(fakes.store.get_all().await.map(|r| r.len()).ok(), Some(1));
}

/// WHAT: Interrupted and failed downloads report distinct statuses
/// WHY: Each outcome maps to its own status line
#[tokio::test(start_paused = true)]
async fn given_download_when_interrupted_or_failing_then_status_reported() {
    // Given: A finished recording
    let fakes = PageFakes::new(0);
    let mut page = recording(&fakes).await;
    command(&mut page, PageCommand::Stop).await;

    // When: A download is interrupted
    command(&mut page, PageCommand::Download).await;
    let id = fakes.downloader.requests()[0].id;
    fakes.downloader.finish(id, DownloadState::Interrupted);
    page.settle().await;

    // Then: The interruption is reported
    assert_eq!(
        page.view().status.text,
        "Download interrupted - saved to temporary storage"
    );

    // When: The next download fails to start
    fakes.downloader.fail_next();
    command(&mut page, PageCommand::Download).await;

    // Then: The failure is reported
    assert_eq!(page.view().status.text, "Download failed");
}

/// WHAT: Loading a stored recording puts it in the player
/// WHY: History entries can be replayed and downloaded
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stored_recording_when_loaded_then_player_shows_it() {
    // Given: One stored recording
    let fakes = PageFakes::new(0);
    let id = fakes
        .store
        .add(artifact("screen-recording-a.webm", &[1, 2, 3, 4]))
        .await
        .unwrap();
    let mut page = open(&fakes).await;

    // When: Loading it
    command(&mut page, PageCommand::LoadRecording(id)).await;

    // Then: It is in the player and downloadable
    assert_eq!(page.view().status.text, "Recording loaded");
    assert!(page.view().player_visible);
    assert!(page.view().controls.download);
    assert!(page.has_artifact());

    // When: Loading a missing record
    command(
        &mut page,
        PageCommand::LoadRecording(RecordId(id.0 + 10)),
    )
    .await;

    // Then: The failure is reported
    assert_eq!(page.view().status.text, "Failed to load recording");
}

/// WHAT: History listing, delete and clear update the panel and the status
/// WHY: Delete removes exactly one record and clear removes all
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stored_recordings_when_deleting_and_clearing_then_listing_updates() {
    // Given: Three stored recordings
    let fakes = PageFakes::new(0);
    let first = fakes.store.add(artifact("a.webm", &[1])).await.unwrap();
    fakes.store.add(artifact("b.webm", &[1, 2])).await.unwrap();
    fakes.store.add(artifact("c.webm", &[1, 2, 3])).await.unwrap();
    let mut page = open(&fakes).await;

    // When: Refreshing the history
    command(&mut page, PageCommand::RefreshHistory).await;

    // Then: All three are listed in key order
    let names: Vec<String> = match page.view().history.clone() {
        Some(HistoryListing::Entries(entries)) => entries.into_iter().map(|e| e.filename).collect(),
        _ => Vec::new(),
    };
    assert_eq!(names, vec!["a.webm", "b.webm", "c.webm"]);

    // When: Deleting the first one
    command(&mut page, PageCommand::DeleteRecording(first)).await;

    // Then: Exactly one is gone
    assert_eq!(page.view().status.text, "Recording deleted");
    assert_eq!(fakes.store.get_all().await.unwrap().len(), 2);

    // When: Clearing the history
    command(&mut page, PageCommand::ClearHistory).await;

    // Then: Nothing is left
    assert_eq!(page.view().status.text, "All recordings cleared");
    assert_eq!(page.view().history, Some(HistoryListing::Empty));
}

/// WHAT: An unreachable store degrades the history panel
/// WHY: Storage failures must never crash the page
#[tokio::test]
async fn given_failing_store_when_using_history_then_degraded_view() {
    // Given: A page whose store is unreachable
    let fakes = PageFakes::new(0);
    let (mut page, _handle) = RecorderPage::open(fakes.platform_with_store(Arc::new(FailingStore)));
    page.initialize().await;

    // When: Refreshing and clearing
    command(&mut page, PageCommand::RefreshHistory).await;
    let listing = page.view().history.clone();
    command(&mut page, PageCommand::ClearHistory).await;

    // Then: Errors are shown, the page keeps running
    assert_eq!(listing, Some(HistoryListing::Error));
    assert_eq!(page.view().status.text, "Failed to clear recordings");
    assert_eq!(page.state(), SessionState::Idle);
}

/// WHAT: Settings are saved on request and locked while recording
/// WHY: The running session must keep the settings it started with
#[tokio::test(start_paused = true)]
async fn given_settings_edits_when_saved_or_recording_then_persisted_or_ignored() {
    // Given: An idle page
    let fakes = PageFakes::new(0);
    let mut page = open(&fakes).await;
    let edited = Settings {
        resolution: "1280x720".to_string(),
        codec: "vp8".to_string(),
        delay: 0,
    };

    // When: Editing and saving
    command(&mut page, PageCommand::UpdateSettings(edited.clone())).await;
    command(&mut page, PageCommand::SaveSettings).await;

    // Then: The settings are persisted
    assert_eq!(fakes.settings.saved_settings(), Some(edited.clone()));
    assert_eq!(page.view().status.text, "Settings saved");

    // When: Editing while recording
    command(&mut page, PageCommand::Start).await;
    command(
        &mut page,
        PageCommand::UpdateSettings(Settings {
            delay: 9,
            ..edited.clone()
        }),
    )
    .await;

    // Then: The edit is ignored and the encoder used the saved resolution
    assert_eq!(page.settings(), &edited);
    assert_eq!(
        fakes.encoders.last_config().map(|c| c.bits_per_second),
        Some(8_000_000)
    );
}

/// WHAT: Theme and minimal mode toggles persist immediately
/// WHY: Preferences survive a page restart
#[tokio::test]
async fn given_preferences_when_toggled_then_persisted() {
    // Given: A page with default preferences
    let fakes = PageFakes::new(0);
    let mut page = open(&fakes).await;

    // When: Toggling theme and minimal mode
    command(&mut page, PageCommand::ToggleTheme).await;
    command(&mut page, PageCommand::ToggleMinimalMode).await;

    // Then: Both are saved and shown
    let saved = fakes.settings.saved_preferences();
    assert_eq!(saved.map(|p| p.theme), Some(Theme::Dark));
    assert_eq!(saved.map(|p| p.minimal_mode), Some(true));
    assert_eq!(page.view().preferences.theme, Theme::Dark);
}

/// WHAT: Shutdown releases the session and ends the message loop
/// WHY: Closing the window must not leave capture running
#[tokio::test(start_paused = true)]
async fn given_recording_when_shut_down_then_released_and_loop_ends() {
    // Given: A recording page
    let fakes = PageFakes::new(0);
    let mut page = recording(&fakes).await;

    // When: Shutting down
    let keep_running = page
        .dispatch(PageMessage::Command(PageCommand::Shutdown))
        .await;

    // Then: The loop ends and everything is released
    assert!(!keep_running);
    assert_cleaned(&page);
}

/// WHAT: The page handle publishes view updates
/// WHY: Hosts render from the handle, never from the page itself
#[tokio::test(start_paused = true)]
async fn given_running_page_when_commands_sent_through_handle_then_view_published() {
    // Given: A page running on its own task
    let fakes = PageFakes::new(0);
    let (page, handle) = RecorderPage::open(fakes.platform());
    let task = tokio::spawn(page.run());
    let mut views = handle.subscribe();

    // When: Starting through the handle
    handle.start().ok();
    let recording = views
        .wait_for(|v| v.phase == SessionState::Recording)
        .await
        .map(|v| v.status.text.clone());

    // Then: The handle sees the recording view
    assert_eq!(recording.ok().as_deref(), Some("Recording..."));

    // When: Shutting down
    handle.send(PageCommand::Shutdown).ok();
    let joined = task.await;

    // Then: The page task ends
    assert!(joined.is_ok());
}
