use crate::config::Config;

use recorder_core::{Settings, Theme, UiPreferences};

/// WHAT: An empty file yields the default configuration
/// WHY: Users may delete every line and still get a working recorder
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_file_when_parsing_then_defaults_apply() {
    // Given/When: Parsing an empty document
    let config = Config::parse("").unwrap();

    // Then: Recorder and UI defaults are used
    assert_eq!(config.recorder, Settings::default());
    assert_eq!(config.recorder.resolution, "1920x1080");
    assert_eq!(config.recorder.delay, 3);
    assert!(config.ui.auto_play);
    assert_eq!(config.ui.theme, Theme::Light);
    assert!(config.storage.recordings_dir.is_none());
}

/// WHAT: A partial section keeps defaults for missing fields
/// WHY: Older config files must keep loading after new fields are added
#[test]
#[allow(clippy::unwrap_used)]
fn given_partial_section_when_parsing_then_missing_fields_default() {
    // Given: Only the delay and theme are set
    let contents = "[recorder]\ndelay = 0\n\n[ui]\ntheme = \"dark\"\n";

    // When: Parsing
    let config = Config::parse(contents).unwrap();

    // Then: Set fields are taken, the rest default
    assert_eq!(config.recorder.delay, 0);
    assert_eq!(config.recorder.codec, "vp9");
    assert_eq!(config.ui.theme, Theme::Dark);
    assert!(config.ui.auto_play);
}

/// WHAT: Malformed TOML is a config error
/// WHY: A broken file must be reported, not silently replaced
#[test]
fn given_malformed_file_when_parsing_then_error() {
    // Given/When: Parsing a broken document
    let result = Config::parse("[recorder\ndelay = ");

    // Then: Parsing fails
    assert!(result.is_err());
}

/// WHAT: Saved configuration reads back identically
/// WHY: Settings saved from the page must survive a restart
#[test]
#[allow(clippy::unwrap_used)]
fn given_modified_config_when_saved_and_reloaded_then_values_match() {
    // Given: A configuration with changed settings and preferences
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut config = Config::default();
    config.recorder = Settings {
        resolution: "1280x720".to_string(),
        codec: "h264".to_string(),
        delay: 5,
    };
    config.ui.apply(&UiPreferences {
        theme: Theme::Dark,
        minimal_mode: true,
    });

    // When: Saving and parsing the file back
    config.save_to(&path).unwrap();
    let reloaded = Config::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();

    // Then: Everything round-trips and no temp file is left behind
    assert_eq!(reloaded.recorder, config.recorder);
    assert_eq!(reloaded.ui.preferences(), config.ui.preferences());
    assert!(!path.with_extension("toml.tmp").exists());
}
