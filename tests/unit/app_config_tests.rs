/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use lyricsub::app_config::{Config, DurationPolicy, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.output_dir, std::path::PathBuf::from("output"));
    assert_eq!(config.timing.line_spacing_ms, 4000);
    assert_eq!(config.timing.trailing_duration_ms, 5000);
    assert_eq!(config.timing.min_cue_ms, 10);
    assert!(config.validation.allow_blank_lines);
    assert!(!config.validation.require_text);
    assert!(!config.compiler.reorder_by_timestamp);
    assert_eq!(config.request.duration, DurationPolicy::Range { min: 30, max: 600 });
    assert_eq!(config.request.default_duration, 95);
    assert_eq!(config.encoder.program, "ffmpeg");
    assert_eq!(config.log_level, LogLevel::Info);

    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.timing.line_spacing_ms = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.timing.min_cue_ms = 5;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.timing.trailing_duration_ms = u64::MAX;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.timing.line_spacing_ms = 3_600_001;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.timing.line_spacing_ms = 3_600_000;
    assert!(config.validate().is_ok());

    let mut config = Config::default();
    config.request.duration = DurationPolicy::Range { min: 300, max: 30 };
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.request.duration = DurationPolicy::OneOf { values: vec![] };
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.request.request_id_pattern = Some("(unclosed".to_string());
    assert!(config.validate().is_err());
}

/// Test that partial config files are filled with defaults
#[test]
fn test_config_deserialization_withPartialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "timing": { "line_spacing_ms": 3000 },
        "request": { "duration": { "kind": "one_of", "values": [95, 285] } },
        "log_level": "debug"
    }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.timing.line_spacing_ms, 3000);
    assert_eq!(config.timing.trailing_duration_ms, 5000);
    assert_eq!(config.request.duration, DurationPolicy::OneOf { values: vec![95, 285] });
    assert!(config.request.duration.accepts(285));
    assert!(!config.request.duration.accepts(120));
    assert_eq!(config.log_level, LogLevel::Debug);

    Ok(())
}

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(created, Config::default());

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded, created);

    Ok(())
}

/// Test that a broken config file is reported
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test the duration policy descriptions used in error messages
#[test]
fn test_duration_policy_describe_shouldBeReadable() {
    assert_eq!(DurationPolicy::Range { min: 30, max: 600 }.describe(), "30-600s");
    assert_eq!(DurationPolicy::OneOf { values: vec![95, 285] }.describe(), "one of 95s, 285s");
}
