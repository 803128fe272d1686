/*!
 * Tests for application startup: configuration and controller creation
 */

use anyhow::Result;

use lyricsub::app_config::{Config, DurationPolicy};
use lyricsub::app_controller::Controller;
use lyricsub::errors::AppError;
use lyricsub::request::RequestDocument;
use crate::common;

/// Test controller creation from a config file written on first start
#[test]
fn test_controller_withCreatedConfig_shouldStart() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&config_path)?;
    let controller = Controller::with_config(config)?;

    assert_eq!(controller.config().timing.line_spacing_ms, 4000);
    Ok(())
}

/// Test that an invalid configuration is rejected at startup
#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.timing.trailing_duration_ms = 0;

    assert!(Controller::with_config(config).is_err());
}

/// Test that a configured duration policy is enforced
#[test]
fn test_controller_withOneOfDurations_shouldEnforcePolicy() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::config_with_output(temp_dir.path());
    config.request.duration = DurationPolicy::OneOf { values: vec![95, 285] };
    let controller = Controller::with_config(config)?;

    let mut request = RequestDocument::with_lyrics("req_1", common::SAMPLE_LRC);
    request.duration = Some(285);
    assert!(controller.build_subtitle(&request).is_ok());

    request.duration = Some(120);
    assert!(controller.build_subtitle(&request).is_err());
    Ok(())
}

/// Test loading a request from disk and building it
#[test]
fn test_build_subtitle_from_file_shouldUseRequestId() -> Result<()> {
    let input_dir = common::create_temp_dir()?;
    let output_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::config_with_output(output_dir.path()))?;

    let request_file = common::create_lrc_request(input_dir.path(), "song_42", common::SAMPLE_LRC)?;
    let artifact = controller.build_subtitle_from_file(&request_file)?;

    assert_eq!(artifact, output_dir.path().join("song_42.srt"));
    assert!(artifact.exists());

    let missing = controller.build_subtitle_from_file(input_dir.path().join("nope.json"));
    assert!(matches!(missing, Err(AppError::File(_))));
    Ok(())
}

/// Test that video rendering refuses to run without the song audio
#[test]
fn test_render_video_withMissingAudio_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::config_with_output(temp_dir.path()))?;
    let request = RequestDocument::with_lyrics("req_1", common::SAMPLE_LRC);

    let result = tokio_test::block_on(controller.render_video(
        &request,
        temp_dir.path().join("missing.wav"),
        temp_dir.path().join("background.jpg"),
        None,
    ));

    assert!(matches!(result, Err(AppError::File(_))));
    assert!(temp_dir.path().join("req_1.srt").exists());
    Ok(())
}
