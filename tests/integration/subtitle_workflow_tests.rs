/*!
 * End-to-end tests for request to subtitle artifact builds
 */

use anyhow::Result;
use std::fs;

use lyricsub::app_controller::Controller;
use lyricsub::errors::{AppError, LyricError};
use lyricsub::lyrics::Section;
use lyricsub::request::RequestDocument;
use lyricsub::subtitle_processor::SubtitleTrack;
use lyricsub::validation::{IssueLocation, ValidationIssue};
use crate::common;

/// Test the two-line raw request produces the expected artifact
#[test]
fn test_build_subtitle_withRawLyrics_shouldWriteExpectedSrt() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::config_with_output(temp_dir.path()))?;

    let request = RequestDocument::with_lyrics("req_1", common::SAMPLE_LRC);
    let artifact = controller.build_subtitle(&request)?;

    assert_eq!(artifact, temp_dir.path().join("req_1.srt"));
    let content = fs::read_to_string(&artifact)?;
    assert_eq!(
        content,
        "1\n00:00:00,000 --> 00:00:05,000\nWalking through the shadows\n\n\
         2\n00:00:05,000 --> 00:00:10,000\nSearching for the truth\n\n"
    );

    Ok(())
}

/// Test that a failing request leaves no artifact behind
#[test]
fn test_build_subtitle_withInvalidLyrics_shouldWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::config_with_output(temp_dir.path()))?;

    let request = RequestDocument::with_lyrics("req_bad", "[00:00.00] a\nVerse 1\n[00:05.00] b");
    let err = controller.build_subtitle(&request).unwrap_err();

    match err {
        AppError::Lyric(LyricError::ValidationFailed(issues)) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].line_number(), Some(2));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!temp_dir.path().join("req_bad.srt").exists());

    Ok(())
}

/// Test that a request with only silence markers yields an empty artifact
#[test]
fn test_build_subtitle_withOnlySilence_shouldWriteEmptyFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::config_with_output(temp_dir.path()))?;

    let request = RequestDocument::with_lyrics("req_quiet", "[00:00.00]\n[00:30.00]");
    let artifact = controller.build_subtitle(&request)?;

    assert_eq!(fs::read_to_string(&artifact)?, "");
    assert!(SubtitleTrack::read_srt_file(&artifact)?.is_empty());

    Ok(())
}

/// Test structured sections are timed with the configured spacing
#[test]
fn test_build_subtitle_withStructure_shouldSynthesizeTimeline() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::config_with_output(temp_dir.path()))?;

    let request = RequestDocument::with_structure(
        "req_struct",
        vec![
            Section::new("verse", Some("00:10.00"), &["one", "two"]),
            Section::new("chorus", Some("01:00.00"), &["three"]),
        ],
    );
    let artifact = controller.build_subtitle(&request)?;
    let track = SubtitleTrack::read_srt_file(&artifact)?;

    assert_eq!(track.cues.len(), 3);
    assert_eq!(track.cues[0].format_start_time(), "00:00:10,000");
    assert_eq!(track.cues[0].format_end_time(), "00:00:14,000");
    assert_eq!(track.cues[1].format_end_time(), "00:01:00,000");
    assert_eq!(track.cues[2].format_start_time(), "00:01:00,000");
    assert_eq!(track.cues[2].format_end_time(), "00:01:05,000");

    Ok(())
}

/// Collect the issues of a failed build, panicking on any other outcome
fn failed_issues(result: Result<std::path::PathBuf, AppError>) -> Vec<ValidationIssue> {
    match result {
        Err(AppError::Lyric(LyricError::ValidationFailed(issues))) => issues,
        other => panic!("expected a validation failure, got {:?}", other),
    }
}

/// Test that request level problems stop the build
#[test]
fn test_build_subtitle_withBadRequest_shouldReportRequestError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::config_with_output(temp_dir.path()))?;

    let mut request = RequestDocument::with_lyrics("req_long", common::SAMPLE_LRC);
    request.duration = Some(5000);
    let issues = failed_issues(controller.build_subtitle(&request));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].location, IssueLocation::Field("duration".to_string()));
    assert!(issues[0].message.contains("5000s"));

    let request = RequestDocument::with_lyrics("../escape", common::SAMPLE_LRC);
    let issues = failed_issues(controller.build_subtitle(&request));
    assert_eq!(issues[0].location, IssueLocation::Field("request_id".to_string()));

    let mut request = RequestDocument::with_lyrics("req_both", common::SAMPLE_LRC);
    request.structure = Some(vec![Section::new("verse", None, &["x"])]);
    let issues = failed_issues(controller.build_subtitle(&request));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, LyricError::AmbiguousLyricSource.to_string());

    assert!(fs::read_dir(temp_dir.path())?.next().is_none());
    Ok(())
}

/// Test that request and lyric problems are reported together in one pass
#[test]
fn test_build_subtitle_withRequestAndLyricErrors_shouldReportAllOfThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::config_with_output(temp_dir.path()))?;

    let mut request = RequestDocument::with_lyrics("../x", "Verse 1\n[0:05.00] b");
    request.duration = Some(1);

    let issues = failed_issues(controller.build_subtitle(&request));
    let locations: Vec<IssueLocation> = issues.iter().map(|i| i.location.clone()).collect();
    assert_eq!(
        locations,
        vec![
            IssueLocation::Field("request_id".to_string()),
            IssueLocation::Field("duration".to_string()),
            IssueLocation::Line(1),
            IssueLocation::Line(2),
        ]
    );
    assert_eq!(issues.len(), controller.check_request(&request).problems().len());

    Ok(())
}

/// Test that a section line holding a line break is rejected before writing
#[test]
fn test_build_subtitle_withLineBreakInSection_shouldWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::config_with_output(temp_dir.path()))?;

    let request = RequestDocument::with_structure(
        "req_breaks",
        vec![Section::new("verse", Some("00:00.00"), &["first\n\nsecond", "third"])],
    );
    let issues = failed_issues(controller.build_subtitle(&request));

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].location, IssueLocation::SectionLine { section: 1, line: 1 });
    assert!(!temp_dir.path().join("req_breaks.srt").exists());

    Ok(())
}

/// Test building every request in a folder, past individual failures
#[test]
fn test_build_folder_withMixedRequests_shouldBuildValidOnes() -> Result<()> {
    let input_dir = common::create_temp_dir()?;
    let output_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::config_with_output(output_dir.path()))?;

    common::create_lrc_request(input_dir.path(), "a_good", common::SAMPLE_LRC)?;
    common::create_lrc_request(input_dir.path(), "b_bad", "no timestamps here")?;
    common::create_test_file(input_dir.path(), "notes.txt", "ignored")?;

    let outcomes = controller.build_folder(input_dir.path())?;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].artifact, Some(output_dir.path().join("a_good.srt")));
    assert!(outcomes[0].error.is_none());
    assert!(outcomes[1].artifact.is_none());
    assert!(outcomes[1].error.as_deref().unwrap().contains("Missing timestamp"));
    assert!(!output_dir.path().join("b_bad.srt").exists());

    Ok(())
}

/// Test the dry run reports everything and writes nothing
#[test]
fn test_check_request_shouldCollectProblemsWithoutWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::config_with_output(temp_dir.path()))?;

    let good = controller.check_request(&RequestDocument::with_lyrics("req_ok", common::SAMPLE_LRC));
    assert!(good.is_ok());
    assert_eq!(good.line_count, 2);
    assert_eq!(good.cue_count, 2);

    let mut bad = RequestDocument::with_lyrics("req_nok", "Verse 1\n[00:00.00] a\n[0:05.00] b");
    bad.duration = Some(1);
    let report = controller.check_request(&bad);
    assert!(!report.is_ok());
    assert_eq!(report.request_errors.len(), 1);
    assert_eq!(report.problems().len(), 3);

    assert!(fs::read_dir(temp_dir.path())?.next().is_none());
    Ok(())
}

/// Test the inference prompt rendering for a raw request
#[test]
fn test_inference_prompt_withRawLyrics_shouldStripTimestamps() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::config_with_output(temp_dir.path()))?;

    let prompt = controller.inference_prompt(&RequestDocument::with_lyrics("req_1", common::SAMPLE_LRC))?;

    assert_eq!(prompt.lyrics, "walking through the shadows\nsearching for the truth");
    assert!(prompt.genre.starts_with("rock"));
    assert_eq!(prompt.duration, 95);

    Ok(())
}
