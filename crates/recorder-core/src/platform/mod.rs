//! Host APIs consumed by the coordinator and the recorder page.

mod capture;
mod download;
mod encoder;
mod page_host;
mod preview;
mod settings_store;
mod store;
mod window;

pub use {
    capture::{
        CaptureConstraints, CaptureSource, CaptureStream, TrackId, TrackInfo, TrackKind,
        TrackReadyState,
    },
    download::{DownloadId, DownloadState, Downloader},
    encoder::{Encoder, EncoderConfig, EncoderEvent, EncoderFactory, EncoderState},
    page_host::PageHost,
    preview::{PreviewUrl, Previewer},
    settings_store::SettingsStore,
    store::{RecordId, RecordingStore, StoredRecording},
    window::{
        ScreenBounds, WindowGeometry, WindowId, WindowInfo, WindowKind, WindowPlatform,
        WindowRequest,
    },
};

use std::sync::Arc;

/// Everything a recorder page needs from its host.
#[derive(Clone)]
pub struct PagePlatform {
    /// Display capture.
    pub capture: Arc<dyn CaptureSource>,
    /// Encoder construction.
    pub encoders: Arc<dyn EncoderFactory>,
    /// Recording history storage.
    pub store: Arc<dyn RecordingStore>,
    /// File downloads.
    pub downloader: Arc<dyn Downloader>,
    /// Preview handles.
    pub previewer: Arc<dyn Previewer>,
    /// Settings persistence.
    pub settings: Arc<dyn SettingsStore>,
    /// The hosting window.
    pub host: Arc<dyn PageHost>,
}
