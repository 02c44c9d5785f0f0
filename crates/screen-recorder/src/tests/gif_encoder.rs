use crate::{
    FrameHub, GifEncoderFactory,
    gif_encoder::{Control, encode_loop, gif_size},
};

use recorder_core::{
    CaptureStream, CoreResult, Encoder, EncoderConfig, EncoderEvent, EncoderFactory, EncoderState,
    EventSink, MediaContainer, PageMessage, SessionEvent, TrackId, TrackInfo, TrackKind,
    TrackReadyState,
};

use std::{sync::mpsc as std_mpsc, time::Duration};

use image::{Rgba, RgbaImage};
use tokio::sync::mpsc;
use uuid::Uuid;

struct StubStream {
    tracks: Vec<TrackInfo>,
}

impl StubStream {
    fn with_state(ready_state: TrackReadyState) -> Self {
        Self {
            tracks: vec![TrackInfo {
                id: TrackId(1),
                kind: TrackKind::Video,
                ready_state,
                enabled: true,
            }],
        }
    }
}

impl CaptureStream for StubStream {
    fn is_active(&self) -> bool {
        self.tracks.iter().any(|t| t.is_usable())
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        self.tracks.clone()
    }

    fn stop_track(&mut self, _id: TrackId) -> CoreResult<()> {
        Ok(())
    }

    fn remove_track(&mut self, _id: TrackId) -> CoreResult<()> {
        Ok(())
    }
}

fn config() -> EncoderConfig {
    EncoderConfig {
        mime_type: "image/gif".to_string(),
        bits_per_second: 8_000_000,
        codec: "gif".to_string(),
        resolution: "1280x720".to_string(),
    }
}

/// WHAT: Small frames keep their size, large ones shrink with their aspect ratio
/// WHY: GIF dimensions are 16-bit and huge frames make huge files
#[test]
fn given_frame_sizes_when_sizing_gif_then_limit_and_aspect_are_respected() {
    // Given/When/Then: Within the limit nothing changes
    assert_eq!(gif_size(800, 600, Some((1280, 720))), (800, 600));

    // Given/When/Then: A 4K frame fits into 1280x720
    assert_eq!(gif_size(3840, 2160, Some((1280, 720))), (1280, 720));

    // Given/When/Then: Without a limit the hard cap applies
    assert_eq!(gif_size(3840, 2160, None), (1920, 1080));
}

/// WHAT: Every codec label maps to the GIF container
/// WHY: This host only writes GIF, whatever the settings form says
#[test]
fn given_any_codec_when_asking_container_then_gif_is_chosen() {
    // Given: A factory
    let factory = GifEncoderFactory::new(FrameHub::new());

    // When/Then: Both supported and unknown codecs give GIF
    assert_eq!(factory.container("vp9"), MediaContainer::Gif);
    assert_eq!(factory.container("h264"), MediaContainer::Gif);
}

/// WHAT: A stream without live tracks cannot get an encoder
/// WHY: Starting an encoder on an ended capture would record nothing
#[test]
fn given_ended_stream_when_creating_encoder_then_error() {
    // Given: A stream whose only track has ended
    let factory = GifEncoderFactory::new(FrameHub::new());
    let stream = StubStream::with_state(TrackReadyState::Ended);
    let (tx, _rx) = mpsc::unbounded_channel();

    // When: Creating an encoder
    let result = factory.create(&stream, config(), EventSink::new(Uuid::new_v4(), tx));

    // Then: Creation fails
    assert!(result.is_err());
}

/// WHAT: Recording produces a complete GIF across chunks and ends with Stopped
/// WHY: Concatenated chunks become the stored recording
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_published_frames_when_recording_then_chunks_form_a_gif() {
    // Given: A live stream and a published frame
    let frames = FrameHub::new();
    frames.publish(RgbaImage::from_pixel(4, 4, Rgba([200, 30, 30, 255])));
    let factory = GifEncoderFactory::new(frames);
    let stream = StubStream::with_state(TrackReadyState::Live);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut encoder = factory
        .create(&stream, config(), EventSink::new(Uuid::new_v4(), tx))
        .unwrap();

    // When: Recording for a few frame intervals then stopping
    encoder.start(Duration::from_millis(50)).unwrap();
    assert_eq!(encoder.state(), EncoderState::Recording);
    tokio::time::sleep(Duration::from_millis(350)).await;
    encoder.stop().unwrap();

    // Then: Started comes first, data follows, Stopped comes last
    let mut started = false;
    let mut stopped = false;
    let mut bytes = Vec::new();
    while !stopped {
        let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        if let PageMessage::Event {
            event: SessionEvent::Encoder(event),
            ..
        } = message
        {
            match event {
                EncoderEvent::Started => started = true,
                EncoderEvent::DataAvailable(chunk) => bytes.extend_from_slice(&chunk),
                EncoderEvent::Stopped => stopped = true,
                EncoderEvent::Failed(reason) => unreachable!("encoder failed: {reason}"),
            }
        }
    }

    assert!(started);
    assert_eq!(encoder.state(), EncoderState::Inactive);
    assert!(bytes.starts_with(b"GIF89a"));
    assert_eq!(bytes.last(), Some(&0x3B));
}

/// WHAT: Stopping an encoder that never started is a no-op
/// WHY: Cleanup stops encoders regardless of how far the session got
#[test]
#[allow(clippy::unwrap_used)]
fn given_inactive_encoder_when_stopped_then_ok() {
    // Given: A created but unstarted encoder
    let factory = GifEncoderFactory::new(FrameHub::new());
    let stream = StubStream::with_state(TrackReadyState::Live);
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut encoder = factory
        .create(&stream, config(), EventSink::new(Uuid::new_v4(), tx))
        .unwrap();

    // When: Stopping it
    let result = encoder.stop();

    // Then: Nothing fails and it stays inactive
    assert!(result.is_ok());
    assert_eq!(encoder.state(), EncoderState::Inactive);
}

/// WHAT: The encoder thread posts Stopped even when its controller vanished
/// WHY: A session waiting in Finalizing only ends on Stopped
#[test]
#[allow(clippy::unwrap_used)]
fn given_dropped_controller_when_encode_loop_exits_then_stopped_is_posted() {
    // Given: A control channel whose sender is already gone
    let (control_tx, control_rx) = std_mpsc::channel::<Control>();
    drop(control_tx);
    let (tx, mut rx) = mpsc::unbounded_channel();

    // When: The loop runs to completion
    encode_loop(
        FrameHub::new(),
        None,
        Duration::from_millis(50),
        control_rx,
        EventSink::new(Uuid::new_v4(), tx),
    );

    // Then: The last event is Stopped
    let mut last = None;
    while let Ok(PageMessage::Event {
        event: SessionEvent::Encoder(event),
        ..
    }) = rx.try_recv()
    {
        last = Some(event);
    }
    assert_eq!(last, Some(EncoderEvent::Stopped));
}
