use crate::{
    CoreResult, FailurePolicy, RecorderError, best_effort,
    history::RecordingHistory,
    platform::{
        CaptureConstraints, CaptureStream, DownloadId, DownloadState, Encoder, EncoderConfig,
        EncoderEvent, EncoderState, PagePlatform, PreviewUrl, RecordId,
    },
    session::{
        COUNTDOWN_TICK, Controls, Effect, EventSink, Input, MediaContainer, PageCommand,
        PageMessage, RecorderView, RecordingArtifact, RecordingTimer, SLICE_INTERVAL,
        SessionEvent, SessionState, Status, StreamFault, StreamHealth, bitrate_for, check_stream,
        transition,
    },
    settings::{Settings, UiPreferences},
};

use std::collections::HashSet;

use chrono::Utc;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{Instant, Interval, interval_at},
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Countdown {
    active: bool,
    pending: Option<JoinHandle<()>>,
}

/// Handle used by the host to drive a [`RecorderPage`] and watch its view.
#[derive(Debug, Clone)]
pub struct PageHandle {
    tx: mpsc::UnboundedSender<PageMessage>,
    view: watch::Receiver<RecorderView>,
}

impl PageHandle {
    /// Queue a command.
    ///
    /// # Errors
    ///
    /// Fails when the page has shut down.
    #[track_caller]
    pub fn send(&self, command: PageCommand) -> CoreResult<()> {
        self.tx
            .send(PageMessage::Command(command))
            .map_err(|_| RecorderError::platform("send page command", "recorder page closed"))
    }

    /// Start recording.
    #[track_caller]
    pub fn start(&self) -> CoreResult<()> {
        self.send(PageCommand::Start)
    }

    /// Stop recording.
    #[track_caller]
    pub fn stop(&self) -> CoreResult<()> {
        self.send(PageCommand::Stop)
    }

    /// Latest published view.
    pub fn view(&self) -> RecorderView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every view change.
    pub fn subscribe(&self) -> watch::Receiver<RecorderView> {
        self.view.clone()
    }
}

/// One recorder page: owns the capture stream, the encoder and the
/// countdown of at most one recording session at a time.
///
/// All user commands and all asynchronous completions arrive on a single
/// ordered channel. Completions are tagged with the session that started
/// them, and completions of an earlier session are discarded.
pub struct RecorderPage {
    platform: PagePlatform,
    history: RecordingHistory,
    state: SessionState,
    session_id: Uuid,
    tx: mpsc::UnboundedSender<PageMessage>,
    rx: mpsc::UnboundedReceiver<PageMessage>,
    settings: Settings,
    preferences: UiPreferences,
    stream: Option<Box<dyn CaptureStream>>,
    encoder: Option<Box<dyn Encoder>>,
    // Set when the encoder can no longer report `Stopped`.
    encoder_stalled: bool,
    container: MediaContainer,
    chunks: Vec<Vec<u8>>,
    artifact: Option<RecordingArtifact>,
    preview: Option<PreviewUrl>,
    timer: RecordingTimer,
    ticker: Option<Interval>,
    countdown: Countdown,
    downloads: HashSet<DownloadId>,
    view: RecorderView,
    view_tx: watch::Sender<RecorderView>,
}

impl RecorderPage {
    /// Create a page over `platform` and a handle to drive it.
    pub fn open(platform: PagePlatform) -> (Self, PageHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let view = RecorderView::default();
        let (view_tx, view_rx) = watch::channel(view.clone());
        let history = RecordingHistory::new(platform.store.clone());

        let handle = PageHandle {
            tx: tx.clone(),
            view: view_rx,
        };

        let page = Self {
            platform,
            history,
            state: SessionState::Idle,
            session_id: Uuid::new_v4(),
            tx,
            rx,
            settings: Settings::default(),
            preferences: UiPreferences::default(),
            stream: None,
            encoder: None,
            encoder_stalled: false,
            container: MediaContainer::WebM,
            chunks: Vec::new(),
            artifact: None,
            preview: None,
            timer: RecordingTimer::default(),
            ticker: None,
            countdown: Countdown::default(),
            downloads: HashSet::new(),
            view,
            view_tx,
        };

        (page, handle)
    }

    /// Load saved settings and preferences and show `Ready`.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn initialize(&mut self) {
        let settings = best_effort(
            self.platform.settings.load_settings().await,
            "load settings",
        );
        if let Some(Some(settings)) = settings {
            self.settings = settings;
        }

        let preferences = best_effort(
            self.platform.settings.load_preferences().await,
            "load preferences",
        );
        if let Some(Some(preferences)) = preferences {
            self.preferences = preferences;
        }

        self.view.settings = self.settings.clone();
        self.view.preferences = self.preferences;
        self.view.status = Status::ready("Ready");
        self.publish();

        info!(
            resolution = %self.settings.resolution,
            codec = %self.settings.codec,
            delay = self.settings.delay,
            "Recorder page ready"
        );
    }

    /// Initialize, then process messages until shut down.
    pub async fn run(mut self) {
        self.initialize().await;
        while self.step().await {}
        self.cleanup();
        info!("Recorder page closed");
    }

    /// Wait for and process one message. Returns `false` once shut down.
    pub async fn step(&mut self) -> bool {
        let message = tokio::select! {
            biased;
            message = self.rx.recv() => message,
            () = next_tick(&mut self.ticker) => {
                self.publish();
                return true;
            }
        };

        match message {
            Some(message) => self.dispatch(message).await,
            None => false,
        }
    }

    /// Process every message that is already queued.
    ///
    /// Spawned completions get a chance to run before each check.
    pub async fn settle(&mut self) -> bool {
        loop {
            tokio::task::yield_now().await;
            match self.rx.try_recv() {
                Ok(message) => {
                    if !self.dispatch(message).await {
                        return false;
                    }
                }
                Err(_) => return true,
            }
        }
    }

    /// Process one message. Returns `false` on shutdown.
    pub async fn dispatch(&mut self, message: PageMessage) -> bool {
        match message {
            PageMessage::Command(command) => self.on_command(command).await,
            PageMessage::Event {
                event: SessionEvent::DownloadChanged { id, state },
                ..
            } => {
                self.on_download_changed(id, state);
                true
            }
            PageMessage::Event { session_id, event } if session_id != self.session_id => {
                discard(session_id, event);
                true
            }
            PageMessage::Event { event, .. } => {
                self.on_event(event).await;
                true
            }
        }
    }

    /// Release every session resource and return to an idle, interactive view.
    ///
    /// Safe to call from any state and any number of times.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn cleanup(&mut self) {
        self.release_session();
        self.state = SessionState::Idle;
        self.publish();
    }

    /// Session phase.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Identifier of the current session.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Last published view.
    pub fn view(&self) -> &RecorderView {
        &self.view
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Buffered encoder chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Tracks of the held capture stream.
    pub fn track_count(&self) -> usize {
        self.stream.as_ref().map_or(0, |s| s.tracks().len())
    }

    /// State of the held encoder.
    pub fn encoder_state(&self) -> EncoderState {
        self.encoder
            .as_ref()
            .map_or(EncoderState::Inactive, |e| e.state())
    }

    /// Whether a finished or loaded recording is cached.
    pub fn has_artifact(&self) -> bool {
        self.artifact.is_some()
    }

    /// Whether the countdown is running or a tick is pending.
    pub fn countdown_pending(&self) -> bool {
        self.countdown.active || self.countdown.pending.is_some()
    }

    fn sink(&self) -> EventSink {
        EventSink::new(self.session_id, self.tx.clone())
    }

    #[instrument(skip(self), fields(session_id = %self.session_id, state = self.state.name()))]
    async fn on_command(&mut self, command: PageCommand) -> bool {
        match command {
            PageCommand::Start => self.start().await,
            PageCommand::Stop => self.stop().await,
            PageCommand::Toggle => {
                if self.state.is_active() {
                    self.stop().await;
                } else {
                    self.start().await;
                }
            }
            PageCommand::Download => {
                if let Some(artifact) = self.artifact.clone() {
                    self.download(&artifact).await;
                }
            }
            PageCommand::DownloadLatest => match self.history.newest().await {
                Ok(Some(stored)) => self.download(&stored.artifact).await,
                Ok(None) => self.view.status = Status::ready("No recordings found"),
                Err(e) => {
                    warn!(error = %e, "Failed to read latest recording");
                    self.view.status = Status::ready("Download failed");
                }
            },
            PageCommand::LoadRecording(id) => self.load_recording(id).await,
            PageCommand::DownloadRecording(id) => match self.history.find(id).await {
                Ok(stored) => self.download(&stored.artifact).await,
                Err(e) => {
                    warn!(record_id = %id, error = %e, "Failed to read recording");
                    self.view.status = Status::ready("Download failed");
                }
            },
            PageCommand::DeleteRecording(id) => {
                match self.history.delete(id).await {
                    Ok(()) => self.view.status = Status::ready("Recording deleted"),
                    Err(e) => {
                        warn!(record_id = %id, error = %e, "Failed to delete recording");
                        self.view.status = Status::ready("Failed to delete recording");
                    }
                }
                self.refresh_history().await;
            }
            PageCommand::ClearHistory => {
                match self.history.clear().await {
                    Ok(()) => self.view.status = Status::ready("All recordings cleared"),
                    Err(e) => {
                        warn!(error = %e, "Failed to clear recordings");
                        self.view.status = Status::ready("Failed to clear recordings");
                    }
                }
                self.refresh_history().await;
            }
            PageCommand::RefreshHistory => self.refresh_history().await,
            PageCommand::UpdateSettings(settings) => {
                if self.state.is_active() {
                    debug!("Settings are locked while recording");
                } else {
                    self.settings = settings;
                    self.view.settings = self.settings.clone();
                }
            }
            PageCommand::SaveSettings => self.save_settings().await,
            PageCommand::ToggleTheme => {
                self.preferences.theme = self.preferences.theme.toggled();
                self.save_preferences().await;
            }
            PageCommand::ToggleMinimalMode => {
                self.preferences.minimal_mode = !self.preferences.minimal_mode;
                self.save_preferences().await;
            }
            PageCommand::Shutdown => {
                info!("Recorder page shutting down");
                self.cleanup();
                return false;
            }
        }

        self.publish();
        true
    }

    async fn start(&mut self) {
        if self.state.is_active() {
            debug!("Start ignored, session already active");
            return;
        }
        let delay = self.settings.delay;
        self.apply(Input::Start { delay }).await;
    }

    async fn stop(&mut self) {
        if !self.state.is_active() {
            debug!("Stop ignored, no active session");
            return;
        }
        self.apply(Input::Stop).await;
    }

    async fn on_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::StreamReady(Ok(stream)) => {
                let health = check_stream(stream.as_ref());
                info!(tracks = stream.tracks().len(), ?health, "Capture stream acquired");
                self.stream = Some(stream);
                self.apply(Input::StreamAcquired(health)).await;
            }
            SessionEvent::StreamReady(Err(e)) => {
                if e.policy() == FailurePolicy::Relaunch {
                    warn!(error = %e, "Screen capture permission denied");
                    self.apply(Input::StreamDenied).await;
                } else {
                    error!(error = %e, "Failed to acquire capture stream");
                    self.apply(Input::StreamFailed(e.to_string())).await;
                }
            }
            SessionEvent::TrackEnded(track) => {
                info!(track = track.0, "Capture track ended");
                self.apply(Input::TrackEnded).await;
            }
            SessionEvent::CountdownElapsed => {
                self.countdown.pending = None;
                let health = self
                    .stream
                    .as_deref()
                    .map_or(StreamHealth::Faulted(StreamFault::Inactive), |s| {
                        check_stream(s)
                    });
                self.apply(Input::CountdownElapsed(health)).await;
            }
            SessionEvent::Encoder(event) => {
                let input = match event {
                    EncoderEvent::Started => Input::EncoderStarted,
                    EncoderEvent::DataAvailable(chunk) => Input::EncoderData(chunk),
                    EncoderEvent::Stopped => Input::EncoderStopped,
                    EncoderEvent::Failed(reason) => {
                        error!(reason = %reason, "Encoder failed");
                        Input::EncoderFailed(reason)
                    }
                };
                self.apply(input).await;
            }
            SessionEvent::DownloadChanged { id, state } => self.on_download_changed(id, state),
        }
    }

    async fn apply(&mut self, input: Input) {
        let mut next = Some(input);

        while let Some(input) = next.take() {
            let step = transition(&self.state, input);

            if step.next != self.state {
                debug!(
                    from = self.state.name(),
                    to = step.next.name(),
                    "Session transition"
                );
            }
            self.state = step.next;

            for effect in step.effects {
                if let Err(e) = self.execute(effect).await {
                    self.recover(e);
                    break;
                }
            }

            if std::mem::take(&mut self.encoder_stalled) && self.state == SessionState::Finalizing {
                warn!("Encoder cannot report its stop, finalizing without it");
                next = Some(Input::EncoderStopped);
            }
        }

        self.publish();
    }

    async fn execute(&mut self, effect: Effect) -> CoreResult<()> {
        match effect {
            Effect::PrepareStart => {
                self.release_session();
                info!(session_id = %self.session_id, "Recording session starting");
            }
            Effect::RequestStream => self.request_stream(),
            Effect::ShowLive => {
                self.view.preview_visible = true;
                self.view.player_visible = false;
            }
            Effect::ShowCountdown(remaining) => {
                self.countdown.active = true;
                self.view.status = Status::ready(format!("Starting in {remaining} seconds..."));
            }
            Effect::ScheduleTick => self.schedule_tick(),
            Effect::StartEncoder => self.start_encoder()?,
            Effect::StartTimer => {
                self.timer.start();
                let period = COUNTDOWN_TICK;
                self.ticker = Some(interval_at(Instant::now() + period, period));
            }
            Effect::AppendChunk(chunk) => self.chunks.push(chunk),
            Effect::StopTimer => {
                self.timer.stop();
                self.ticker = None;
            }
            Effect::Status(status) => self.view.status = status,
            Effect::FlushEncoder => {
                if let Some(encoder) = self.encoder.as_mut()
                    && encoder.state() != EncoderState::Inactive
                {
                    best_effort(encoder.request_data(), "request encoder data");
                }
            }
            Effect::StopEncoder => {
                let stopping = match self.encoder.as_mut() {
                    Some(encoder) if encoder.state() != EncoderState::Inactive => {
                        best_effort(encoder.stop(), "stop encoder").is_some()
                    }
                    _ => false,
                };
                self.encoder_stalled = !stopping;
            }
            Effect::StopTracks => self.stop_tracks(),
            Effect::Finalize => self.finalize().await?,
            Effect::Cleanup { status } => {
                self.release_session();
                self.view.status = status;
            }
            Effect::RequestReopen => {
                self.release_session();
                self.view.status = Status::ready("Permission denied - please allow screen sharing");
                self.publish();
                best_effort(
                    self.platform.host.request_reopen().await,
                    "request recorder reopen",
                );
                best_effort(self.platform.host.close_window().await, "close window");
            }
        }
        Ok(())
    }

    fn recover(&mut self, e: RecorderError) {
        match e.policy() {
            FailurePolicy::NonFatal | FailurePolicy::Degraded => {
                warn!(error = %e, policy = ?e.policy(), "Session effect failed")
            }
            FailurePolicy::AbortToIdle | FailurePolicy::Relaunch => {
                error!(error = %e, policy = ?e.policy(), "Session aborted")
            }
        }

        self.release_session();
        self.state = SessionState::Idle;
        self.view.status = Status::ready(e.status_text());
    }

    fn request_stream(&self) {
        let constraints = CaptureConstraints::for_resolution(&self.settings.resolution);
        let capture = self.platform.capture.clone();
        let sink = self.sink();

        debug!(?constraints, "Requesting capture stream");

        tokio::spawn(async move {
            let result = capture.request_stream(constraints, sink.clone()).await;
            sink.post(SessionEvent::StreamReady(result));
        });
    }

    fn schedule_tick(&mut self) {
        self.cancel_pending_tick();

        let sink = self.sink();
        self.countdown.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(COUNTDOWN_TICK).await;
            sink.post(SessionEvent::CountdownElapsed);
        }));
    }

    fn cancel_pending_tick(&mut self) {
        if let Some(pending) = self.countdown.pending.take() {
            pending.abort();
        }
    }

    fn start_encoder(&mut self) -> CoreResult<()> {
        self.countdown.active = false;
        self.cancel_pending_tick();

        let Some(stream) = self.stream.as_deref() else {
            return Err(RecorderError::encoder("no capture stream to encode"));
        };

        let container = self.platform.encoders.container(&self.settings.codec);
        let config = EncoderConfig {
            mime_type: container.mime_type().to_string(),
            bits_per_second: bitrate_for(&self.settings.resolution),
            codec: self.settings.codec.clone(),
            resolution: self.settings.resolution.clone(),
        };

        info!(
            mime_type = %config.mime_type,
            bits_per_second = config.bits_per_second,
            "Starting encoder"
        );

        let mut encoder = self
            .platform
            .encoders
            .create(stream, config, self.sink())?;
        encoder.start(SLICE_INTERVAL)?;

        self.container = container;
        self.encoder = Some(encoder);
        Ok(())
    }

    fn stop_tracks(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            for track in stream.tracks() {
                best_effort(stream.stop_track(track.id), "stop track");
            }
        }
    }

    async fn finalize(&mut self) -> CoreResult<()> {
        let chunks = std::mem::take(&mut self.chunks);
        self.encoder = None;
        self.release_stream();
        self.timer.reset();
        self.ticker = None;

        let artifact = RecordingArtifact::from_chunks(
            &chunks,
            self.container,
            &self.settings.resolution,
            Utc::now().timestamp_millis(),
        )?;

        info!(
            filename = %artifact.filename,
            size = artifact.size,
            chunks = chunks.len(),
            "Recording finalized"
        );

        best_effort(self.history.save(artifact.clone()).await, "save recording");
        self.show_artifact(artifact);
        self.view.status = Status::stopped("Recording complete");

        if self.view.history.is_some() {
            self.refresh_history().await;
        }

        Ok(())
    }

    fn show_artifact(&mut self, artifact: RecordingArtifact) {
        self.revoke_preview();

        let url = best_effort(self.platform.previewer.create(&artifact), "create preview");
        if let Some(url) = &url {
            best_effort(self.platform.previewer.play(url), "play preview");
        }

        self.view.player_source = url.clone();
        self.view.player_visible = true;
        self.view.preview_visible = false;
        self.preview = url;
        self.artifact = Some(artifact);
    }

    fn revoke_preview(&mut self) {
        if let Some(url) = self.preview.take() {
            best_effort(self.platform.previewer.revoke(&url), "revoke preview");
        }
        self.view.player_source = None;
    }

    async fn load_recording(&mut self, id: RecordId) {
        if self.state.is_active() {
            debug!("History is locked while recording");
            return;
        }

        match self.history.find(id).await {
            Ok(stored) if stored.artifact.container().is_some() => {
                self.show_artifact(stored.artifact);
                self.view.status = Status::ready("Recording loaded");
            }
            Ok(stored) => {
                warn!(record_id = %id, mime_type = %stored.artifact.mime_type, "Unsupported recording type");
                self.view.status = Status::ready("Failed to load recording");
            }
            Err(e) => {
                warn!(record_id = %id, error = %e, "Failed to load recording");
                self.view.status = Status::ready("Failed to load recording");
            }
        }
    }

    async fn download(&mut self, artifact: &RecordingArtifact) {
        self.view.status = Status::ready("Starting download...");
        self.publish();

        let result = self
            .platform
            .downloader
            .download(artifact, &artifact.filename, true, self.sink())
            .await;

        match result {
            Ok(id) => {
                debug!(download = id.0, filename = %artifact.filename, "Download started");
                self.downloads.insert(id);
            }
            Err(e) => {
                warn!(error = %e, "Download failed to start");
                self.view.status = Status::ready("Download failed");
            }
        }
    }

    fn on_download_changed(&mut self, id: DownloadId, state: DownloadState) {
        if !self.downloads.contains(&id) {
            return;
        }

        let text = match state {
            DownloadState::InProgress => return,
            DownloadState::Complete => "Download completed",
            DownloadState::Interrupted => "Download interrupted - saved to temporary storage",
        };

        self.downloads.remove(&id);
        info!(download = id.0, ?state, "Download finished");
        self.view.status = Status::ready(text);
        self.publish();
    }

    async fn refresh_history(&mut self) {
        self.view.history = Some(self.history.list().await);
    }

    async fn save_settings(&mut self) {
        if self.state.is_active() {
            debug!("Settings are locked while recording");
            return;
        }

        let saved = best_effort(
            self.platform.settings.save_settings(&self.settings).await,
            "save settings",
        );
        if saved.is_some() {
            info!(resolution = %self.settings.resolution, "Settings saved");
            self.view.status = Status::ready("Settings saved");
        }
    }

    async fn save_preferences(&mut self) {
        self.view.preferences = self.preferences;
        best_effort(
            self.platform
                .settings
                .save_preferences(&self.preferences)
                .await,
            "save preferences",
        );
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            for track in stream.tracks() {
                best_effort(stream.stop_track(track.id), "stop track");
                best_effort(stream.remove_track(track.id), "remove track");
            }
        }
    }

    fn release_session(&mut self) {
        self.encoder_stalled = false;
        self.countdown.active = false;
        self.cancel_pending_tick();

        if let Some(mut encoder) = self.encoder.take()
            && encoder.state() != EncoderState::Inactive
        {
            best_effort(encoder.stop(), "stop encoder");
        }

        self.release_stream();
        self.revoke_preview();
        self.chunks.clear();
        self.artifact = None;
        self.timer.reset();
        self.ticker = None;

        self.view.preview_visible = true;
        self.view.player_visible = false;

        // Late completions of the released session must not reach the next one.
        self.session_id = Uuid::new_v4();
    }

    fn publish(&mut self) {
        self.view.phase = self.state;
        self.view.controls = Controls::for_state(self.state, self.artifact.is_some());
        self.view.timer_text = self.timer.text();
        self.view.timer_running = self.timer.is_running();
        self.view_tx.send_replace(self.view.clone());
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn discard(session_id: Uuid, event: SessionEvent) {
    debug!(session_id = %session_id, ?event, "Discarding event of a finished session");

    if let SessionEvent::StreamReady(Ok(mut stream)) = event {
        for track in stream.tracks() {
            best_effort(stream.stop_track(track.id), "stop late track");
        }
    }
}
