use crate::{
    HistoryListing, MemoryStore, RecordingHistory, RecordingStore, format_date, format_file_size,
    tests::fakes::{FailingStore, artifact},
};

use std::sync::Arc;

/// WHAT: Sizes are shown in 1024 steps with trailing zeros trimmed
/// WHY: The history panel must match the familiar byte formatting
#[test]
fn given_byte_counts_when_formatting_then_units_and_decimals_trimmed() {
    // Given / When / Then: Representative sizes
    assert_eq!(format_file_size(0), "0 Bytes");
    assert_eq!(format_file_size(512), "512 Bytes");
    assert_eq!(format_file_size(1024), "1 KB");
    assert_eq!(format_file_size(1536), "1.5 KB");
    assert_eq!(format_file_size(1_048_576), "1 MB");
    assert_eq!(format_file_size(5_242_880 + 262_144), "5.25 MB");
    assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
}

/// WHAT: Dates outside the representable range read "Unknown date"
/// WHY: A corrupt timestamp must not break the listing
#[test]
fn given_out_of_range_timestamp_when_formatting_date_then_unknown() {
    // Given: A timestamp far beyond any calendar date
    let timestamp = i64::MAX;

    // When: Formatting it
    let text = format_date(timestamp);

    // Then: The placeholder is used
    assert_eq!(text, "Unknown date");
    assert_eq!(format_date(0).len(), "1970-01-01 00:00:00".len());
}

/// WHAT: Listings carry formatted rows and the right placeholders
/// WHY: Empty and unreachable stores show different messages
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stores_when_listing_then_entries_or_placeholders() {
    // Given: An empty store, a populated one and a broken one
    let empty = RecordingHistory::new(Arc::new(MemoryStore::new()));
    let store = Arc::new(MemoryStore::new());
    store.add(artifact("a.webm", &[0u8; 1536])).await.unwrap();
    let populated = RecordingHistory::new(store);
    let broken = RecordingHistory::new(Arc::new(FailingStore));

    // When: Listing each
    let empty = empty.list().await;
    let populated = populated.list().await;
    let broken = broken.list().await;

    // Then: Each shows what it should
    assert_eq!(empty.placeholder(), Some("No recordings found"));
    assert_eq!(broken.placeholder(), Some("Error loading recordings"));
    assert_eq!(populated.placeholder(), None);
    let HistoryListing::Entries(entries) = populated else {
        unreachable!("populated store listed without entries");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].size_text, "1.5 KB");
    assert!(entries[0].meta_text().starts_with("1.5 KB • "));
}

/// WHAT: The newest recording is the one with the highest key
/// WHY: "Download latest" must pick the last saved recording
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_saved_recordings_when_asking_newest_then_highest_key_returned() {
    // Given: Two saved recordings
    let history = RecordingHistory::new(Arc::new(MemoryStore::new()));
    history.save(artifact("first.webm", &[1])).await.unwrap();
    let second = history.save(artifact("second.webm", &[2])).await.unwrap();

    // When: Asking for the newest
    let newest = history.newest().await.unwrap();

    // Then: The second one is returned
    assert_eq!(newest.map(|r| r.id), Some(second));
}
