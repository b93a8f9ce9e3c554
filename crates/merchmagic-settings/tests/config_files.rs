//! Loading and saving session configuration files.

use merchmagic_core::OverflowPolicy;
use merchmagic_settings::{ConfigError, SessionConfig, SettingsError};
use std::io::Write;

#[test]
fn test_toml_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.toml");

    let mut config = SessionConfig::default();
    config.artwork.overflow_policy = OverflowPolicy::Center;
    config.export.max_variations = 2;
    config.save_to_file(&path).unwrap();

    let loaded = SessionConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_file_is_accepted() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"print_area": {{"width": 300, "height": 400, "top": 150}}}}"#).unwrap();

    let config = SessionConfig::load_from_file(file.path()).unwrap();
    let area = config.print_area_rect();
    assert_eq!(area.left, 150.0);
    assert_eq!(area.top, 150.0);
}

#[test]
fn test_unknown_extension_is_rejected() {
    let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    let err = SessionConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(ref ext)) if ext == "yaml"
    ));
}

#[test]
fn test_invalid_file_fails_validation() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[export]\nscale_factor = 0.0").unwrap();

    let err = SessionConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, SettingsError::Config(ConfigError::ValueOutOfRange { .. })));
}
