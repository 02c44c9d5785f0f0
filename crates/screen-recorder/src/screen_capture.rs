//! Screen capture of the primary monitor using `xcap`.
//!
//! A capture thread grabs frames at a fixed rate and publishes the latest
//! one on a [`FrameHub`] the encoder samples from. The first grab doubles as
//! the permission check: if it fails, the request is reported as denied.

use recorder_core::{
    CaptureConstraints, CaptureSource, CaptureStream, CoreResult, EventSink, RecorderError,
    TrackId, TrackInfo, TrackKind, TrackReadyState,
};

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use image::RgbaImage;
use tokio::sync::{oneshot, watch};
use tracing::{debug, error, info, instrument, warn};
use xcap::Monitor;

const VIDEO_TRACK: TrackId = TrackId(1);
const MAX_CONSECUTIVE_FAILURES: u32 = 10;
const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Default)]
struct Slot {
    owner: u64,
    frame: Option<Arc<RgbaImage>>,
}

/// Latest captured frame, shared between capture and encoder.
///
/// Each capture session writes through a [`FrameLease`]; once a newer session
/// claims the hub, writes from older leases are ignored.
#[derive(Clone)]
pub struct FrameHub {
    tx: Arc<watch::Sender<Slot>>,
}

impl FrameHub {
    /// Hub without a frame.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Slot::default());
        Self { tx: Arc::new(tx) }
    }

    /// Replace the latest frame regardless of ownership.
    pub fn publish(&self, frame: RgbaImage) {
        self.tx.send_modify(|slot| slot.frame = Some(Arc::new(frame)));
    }

    /// Most recent frame, if any was captured.
    pub fn latest(&self) -> Option<Arc<RgbaImage>> {
        self.tx.borrow().frame.clone()
    }

    /// Take ownership for a new capture session, dropping the previous frame.
    pub fn claim(&self) -> FrameLease {
        let mut owner = 0;
        self.tx.send_modify(|slot| {
            slot.owner += 1;
            slot.frame = None;
            owner = slot.owner;
        });
        FrameLease {
            hub: self.clone(),
            owner,
        }
    }
}

impl Default for FrameHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Write access to a [`FrameHub`] for one capture session.
///
/// Dropping the lease clears the frame unless a newer session owns the hub.
pub struct FrameLease {
    hub: FrameHub,
    owner: u64,
}

impl FrameLease {
    /// Publish `frame`. Returns `false` when a newer session owns the hub.
    pub fn publish(&self, frame: RgbaImage) -> bool {
        self.hub.tx.send_if_modified(|slot| {
            if slot.owner != self.owner {
                return false;
            }
            slot.frame = Some(Arc::new(frame));
            true
        })
    }

}

impl Drop for FrameLease {
    fn drop(&mut self) {
        self.hub.tx.send_if_modified(|slot| {
            if slot.owner != self.owner {
                return false;
            }
            slot.frame = None;
            true
        });
    }
}

fn capture_primary() -> Result<RgbaImage, String> {
    let monitors = Monitor::all().map_err(|e| format!("Failed to enumerate monitors: {e}"))?;
    let monitor = monitors
        .iter()
        .find(|m| m.is_primary())
        .or_else(|| monitors.first())
        .ok_or_else(|| "No monitor found".to_string())?;

    monitor
        .capture_image()
        .map_err(|e| format!("Screen capture failed: {e}"))
}

/// [`CaptureSource`] grabbing the primary monitor.
#[derive(Clone)]
pub struct ScreenCapture {
    frames: FrameHub,
}

impl ScreenCapture {
    /// Capture source publishing into `frames`.
    pub fn new(frames: FrameHub) -> Self {
        Self { frames }
    }
}

#[async_trait]
impl CaptureSource for ScreenCapture {
    #[instrument(skip(self, events))]
    async fn request_stream(
        &self,
        constraints: CaptureConstraints,
        events: EventSink,
    ) -> CoreResult<Box<dyn CaptureStream>> {
        if constraints.echo_cancellation || constraints.noise_suppression {
            debug!("Audio processing requested, but this host captures video only");
        }

        let frame_interval =
            (Duration::from_secs(1) / constraints.frame_rate.max(1)).max(MIN_FRAME_INTERVAL);

        let stop = Arc::new(AtomicBool::new(false));
        let tracks = Arc::new(Mutex::new(vec![TrackInfo {
            id: VIDEO_TRACK,
            kind: TrackKind::Video,
            ready_state: TrackReadyState::Live,
            enabled: true,
        }]));

        let (ready_tx, ready_rx) = oneshot::channel();
        let frames = self.frames.claim();
        let thread_stop = Arc::clone(&stop);
        let thread_tracks = Arc::clone(&tracks);

        thread::Builder::new()
            .name("screen-capture".to_string())
            .spawn(move || {
                capture_loop(
                    frames,
                    frame_interval,
                    thread_stop,
                    thread_tracks,
                    events,
                    ready_tx,
                )
            })
            .map_err(|e| RecorderError::platform("spawn capture thread", e.to_string()))?;

        match ready_rx.await {
            Ok(Ok((width, height))) => {
                info!(width, height, "Screen capture started");
                Ok(Box::new(ScreenStream { stop, tracks }))
            }
            Ok(Err(reason)) => {
                warn!(reason = %reason, "Screen capture refused");
                Err(RecorderError::permission_denied(reason))
            }
            Err(_) => Err(RecorderError::platform(
                "start screen capture",
                "capture thread exited",
            )),
        }
    }
}

fn capture_loop(
    frames: FrameLease,
    frame_interval: Duration,
    stop: Arc<AtomicBool>,
    tracks: Arc<Mutex<Vec<TrackInfo>>>,
    events: EventSink,
    ready: oneshot::Sender<Result<(u32, u32), String>>,
) {
    match capture_primary() {
        Ok(first) => {
            let size = (first.width(), first.height());
            frames.publish(first);
            if ready.send(Ok(size)).is_err() {
                return;
            }
        }
        Err(reason) => {
            let _ = ready.send(Err(reason));
            return;
        }
    }

    let mut failures = 0;

    while !stop.load(Ordering::Acquire) {
        let started = Instant::now();

        match capture_primary() {
            Ok(frame) => {
                failures = 0;
                if !frames.publish(frame) {
                    debug!("Frame hub taken over by a newer capture");
                    break;
                }
            }
            Err(reason) => {
                failures += 1;
                debug!(failures, reason = %reason, "Frame capture failed");
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    error!(reason = %reason, "Screen capture lost, ending video track");
                    end_track(&tracks, VIDEO_TRACK);
                    events.track_ended(VIDEO_TRACK);
                    break;
                }
            }
        }

        if let Some(rest) = frame_interval.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    debug!("Capture thread stopped");
}

fn end_track(tracks: &Mutex<Vec<TrackInfo>>, id: TrackId) {
    let mut tracks = tracks.lock().unwrap_or_else(|e| e.into_inner());
    for track in tracks.iter_mut().filter(|t| t.id == id) {
        track.ready_state = TrackReadyState::Ended;
    }
}

/// Live capture of the primary monitor.
pub struct ScreenStream {
    stop: Arc<AtomicBool>,
    tracks: Arc<Mutex<Vec<TrackInfo>>>,
}

impl CaptureStream for ScreenStream {
    fn is_active(&self) -> bool {
        !self.stop.load(Ordering::Acquire)
            && self
                .tracks
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .iter()
                .any(|t| t.ready_state == TrackReadyState::Live)
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        self.tracks.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn stop_track(&mut self, id: TrackId) -> CoreResult<()> {
        end_track(&self.tracks, id);
        if id == VIDEO_TRACK {
            self.stop.store(true, Ordering::Release);
        }
        Ok(())
    }

    fn remove_track(&mut self, id: TrackId) -> CoreResult<()> {
        self.tracks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|t| t.id != id);
        Ok(())
    }
}

impl Drop for ScreenStream {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
    }
}
