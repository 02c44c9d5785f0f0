/// Bitrate used when the resolution label is not in [`BITRATES`].
pub const DEFAULT_BITRATE: u64 = 16_000_000;

/// Target encoder bitrate per resolution label.
pub const BITRATES: [(&str, u64); 6] = [
    ("3840x2160", 50_000_000),
    ("2560x1440", 32_000_000),
    ("1920x1080", 16_000_000),
    ("1280x720", 8_000_000),
    ("854x480", 4_000_000),
    ("640x360", 2_000_000),
];

/// Bitrate for a resolution label, falling back to [`DEFAULT_BITRATE`].
pub fn bitrate_for(resolution: &str) -> u64 {
    BITRATES
        .iter()
        .find(|(label, _)| *label == resolution)
        .map(|(_, bps)| *bps)
        .unwrap_or(DEFAULT_BITRATE)
}
