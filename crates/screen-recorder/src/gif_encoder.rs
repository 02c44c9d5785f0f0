//! Animated GIF encoder fed from the latest captured frame.
//!
//! The encoder thread samples the [`FrameHub`] at a fixed rate, writes GIF
//! frames into a shared buffer, and hands out whatever accumulated as a
//! chunk every slice interval and on every flush.

use crate::FrameHub;

use recorder_core::{
    CaptureStream, CoreResult, Encoder, EncoderConfig, EncoderEvent, EncoderFactory,
    EncoderState, EventSink, MediaContainer, RecorderError, parse_resolution,
};

use std::{
    io::{self, Write},
    sync::{
        Arc, Mutex,
        mpsc::{self, RecvTimeoutError},
    },
    thread,
    time::{Duration, Instant},
};

use gif::{Frame, Repeat};
use image::{
    RgbaImage,
    imageops::{self, FilterType},
};
use tracing::{debug, error, info, instrument, warn};

const GIF_FRAME_INTERVAL: Duration = Duration::from_millis(100);
const GIF_FRAME_DELAY: u16 = 10;
const GIF_QUANTIZE_SPEED: i32 = 10;
const MAX_GIF_DIMENSION: u32 = 1920;

/// Growable byte buffer shared between the GIF writer and the drain.
#[derive(Clone, Default)]
struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.bytes.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    Flush,
    Stop,
}

/// Output size for frames of `width`x`height` bounded by `limit`.
pub fn gif_size(width: u32, height: u32, limit: Option<(u32, u32)>) -> (u32, u32) {
    let (max_w, max_h) = limit.unwrap_or((MAX_GIF_DIMENSION, MAX_GIF_DIMENSION));
    let max_w = max_w.min(MAX_GIF_DIMENSION).max(1);
    let max_h = max_h.min(MAX_GIF_DIMENSION).max(1);

    if width <= max_w && height <= max_h {
        return (width.max(1), height.max(1));
    }

    let scale = (max_w as f64 / width as f64).min(max_h as f64 / height as f64);
    let scaled_w = ((width as f64 * scale).round() as u32).clamp(1, max_w);
    let scaled_h = ((height as f64 * scale).round() as u32).clamp(1, max_h);
    (scaled_w, scaled_h)
}

/// Creates [`GifEncoder`]s reading from a shared [`FrameHub`].
#[derive(Clone)]
pub struct GifEncoderFactory {
    frames: FrameHub,
}

impl GifEncoderFactory {
    /// Factory sampling `frames`.
    pub fn new(frames: FrameHub) -> Self {
        Self { frames }
    }
}

impl EncoderFactory for GifEncoderFactory {
    fn container(&self, codec: &str) -> MediaContainer {
        if codec != "gif" {
            debug!(codec = %codec, "Codec not available, recording GIF instead");
        }
        MediaContainer::Gif
    }

    fn create(
        &self,
        stream: &dyn CaptureStream,
        config: EncoderConfig,
        events: EventSink,
    ) -> CoreResult<Box<dyn Encoder>> {
        if !stream.tracks().iter().any(|t| t.is_usable()) {
            return Err(RecorderError::encoder("stream has no usable track"));
        }

        Ok(Box::new(GifEncoder {
            state: EncoderState::Inactive,
            limit: parse_resolution(&config.resolution),
            config,
            frames: self.frames.clone(),
            events,
            control: None,
        }))
    }
}

/// Encoder writing an animated GIF on a dedicated thread.
pub struct GifEncoder {
    state: EncoderState,
    config: EncoderConfig,
    limit: Option<(u32, u32)>,
    frames: FrameHub,
    events: EventSink,
    control: Option<mpsc::Sender<Control>>,
}

impl GifEncoder {
    #[track_caller]
    fn send(&self, control: Control) -> CoreResult<()> {
        match &self.control {
            Some(tx) => tx
                .send(control)
                .map_err(|_| RecorderError::encoder("encoder thread is gone")),
            None => Err(RecorderError::encoder("encoder not started")),
        }
    }
}

impl Encoder for GifEncoder {
    fn state(&self) -> EncoderState {
        self.state
    }

    #[instrument(skip(self), fields(mime_type = %self.config.mime_type))]
    fn start(&mut self, slice: Duration) -> CoreResult<()> {
        if self.state != EncoderState::Inactive {
            return Err(RecorderError::encoder("encoder already started"));
        }

        let (tx, rx) = mpsc::channel();
        let frames = self.frames.clone();
        let events = self.events.clone();
        let limit = self.limit;

        thread::Builder::new()
            .name("gif-encoder".to_string())
            .spawn(move || encode_loop(frames, limit, slice, rx, events))
            .map_err(|e| RecorderError::encoder(format!("Failed to spawn encoder thread: {e}")))?;

        self.control = Some(tx);
        self.state = EncoderState::Recording;
        self.events.encoder(EncoderEvent::Started);

        info!(
            bits_per_second = self.config.bits_per_second,
            slice_ms = slice.as_millis() as u64,
            "GIF encoder started"
        );
        Ok(())
    }

    fn request_data(&mut self) -> CoreResult<()> {
        self.send(Control::Flush)
    }

    fn stop(&mut self) -> CoreResult<()> {
        if self.state == EncoderState::Inactive {
            return Ok(());
        }
        self.state = EncoderState::Inactive;
        let sent = self.send(Control::Stop);
        self.control = None;
        sent
    }
}

fn drain(buffer: &SharedBuffer, events: &EventSink) {
    let chunk = buffer.take();
    if !chunk.is_empty() {
        events.encoder(EncoderEvent::DataAvailable(chunk));
    }
}

pub(crate) fn encode_loop(
    frames: FrameHub,
    limit: Option<(u32, u32)>,
    slice: Duration,
    control: mpsc::Receiver<Control>,
    events: EventSink,
) {
    let buffer = SharedBuffer::default();
    let mut writer: Option<(gif::Encoder<SharedBuffer>, u32, u32)> = None;
    let mut last_drain = Instant::now();
    let mut written: u64 = 0;

    loop {
        match control.recv_timeout(GIF_FRAME_INTERVAL) {
            Ok(Control::Flush) => {
                drain(&buffer, &events);
                last_drain = Instant::now();
                continue;
            }
            Ok(Control::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        if let Some(frame) = frames.latest() {
            if let Err(reason) = write_frame(&mut writer, &buffer, &frame, limit) {
                error!(reason = %reason, "GIF encoding failed");
                events.encoder(EncoderEvent::Failed(reason));
                break;
            }
            written += 1;
        }

        if last_drain.elapsed() >= slice {
            drain(&buffer, &events);
            last_drain = Instant::now();
        }
    }

    // Dropping the encoder writes the GIF trailer. Stopped is posted on every
    // exit, failures included.
    drop(writer);
    drain(&buffer, &events);

    if written == 0 {
        warn!("GIF encoder stopped before any frame was captured");
    }
    debug!(frames = written, "GIF encoder stopped");
    events.encoder(EncoderEvent::Stopped);
}

fn write_frame(
    writer: &mut Option<(gif::Encoder<SharedBuffer>, u32, u32)>,
    buffer: &SharedBuffer,
    frame: &RgbaImage,
    limit: Option<(u32, u32)>,
) -> Result<(), String> {
    if writer.is_none() {
        let (width, height) = gif_size(frame.width(), frame.height(), limit);
        let mut encoder = gif::Encoder::new(buffer.clone(), width as u16, height as u16, &[])
            .map_err(|e| format!("Failed to create GIF encoder: {e}"))?;
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| format!("Failed to set GIF repeat: {e}"))?;
        *writer = Some((encoder, width, height));
    }

    let Some((encoder, width, height)) = writer.as_mut() else {
        return Err("GIF encoder missing".to_string());
    };

    let mut pixels = if frame.width() == *width && frame.height() == *height {
        frame.as_raw().clone()
    } else {
        imageops::resize(frame, *width, *height, FilterType::Nearest).into_raw()
    };

    let mut gif_frame =
        Frame::from_rgba_speed(*width as u16, *height as u16, &mut pixels, GIF_QUANTIZE_SPEED);
    gif_frame.delay = GIF_FRAME_DELAY;

    encoder
        .write_frame(&gif_frame)
        .map_err(|e| format!("Failed to write GIF frame: {e}"))
}
