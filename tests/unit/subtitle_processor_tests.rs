/*!
 * Tests for subtitle rendering and parsing
 */

use anyhow::Result;
use std::fmt::Write;
use lyricsub::subtitle_processor::{SubtitleCue, SubtitleTrack};
use lyricsub::timestamp::Timestamp;
use crate::common;

fn cue(index: usize, start: &str, end: &str, text: &str) -> SubtitleCue {
    SubtitleCue::new(
        index,
        Timestamp::parse(start).unwrap(),
        Timestamp::parse(end).unwrap(),
        text.to_string(),
    )
}

/// Test SRT timestamp parsing and formatting
#[test]
fn test_timestamp_parsing_withValidTimestamp_shouldParseAndFormat() {
    let ts = SubtitleCue::parse_timestamp("00:01:05,250").unwrap();
    assert_eq!(ts.as_millis(), 65_250);
    assert_eq!(ts.format_subtitle(), "00:01:05,250");

    assert!(SubtitleCue::parse_timestamp("00:61:05,250").is_err());
    assert!(SubtitleCue::parse_timestamp("nonsense").is_err());
}

/// Test cue display formatting
#[test]
fn test_subtitle_cue_display_withValidCue_shouldFormatCorrectly() {
    let mut output = String::new();
    write!(output, "{}", cue(3, "01:02.50", "01:04.00", "Hold on")).unwrap();

    assert_eq!(output, "3\n00:01:02,500 --> 00:01:04,000\nHold on\n\n");
}

/// Test that cues in a track are separated by exactly one blank line
#[test]
fn test_track_rendering_withTwoCues_shouldSeparateByOneBlankLine() {
    let track = SubtitleTrack::new(vec![
        cue(1, "00:00.00", "00:05.00", "a"),
        cue(2, "00:05.00", "00:10.00", "b"),
    ]);

    let rendered = track.to_srt_string();
    assert!(rendered.contains("a\n\n2\n"));
    assert!(!rendered.contains("\n\n\n"));
}

/// Test writing a track to disk and reading it back
#[test]
fn test_write_to_srt_withTrack_shouldRoundTripThroughFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("req_1.srt");
    let track = SubtitleTrack::new(vec![
        cue(1, "00:00.00", "00:05.00", "Walking through the shadows"),
        cue(2, "00:05.00", "00:10.00", "Searching for the truth"),
    ]);

    track.write_to_srt(&path)?;
    let read_back = SubtitleTrack::read_srt_file(&path)?;

    assert_eq!(read_back, track);

    // No temporary files are left next to the artifact
    let entries = std::fs::read_dir(path.parent().unwrap())?.count();
    assert_eq!(entries, 1);

    Ok(())
}

/// Test that an empty track still produces an (empty) file
#[test]
fn test_write_to_srt_withEmptyTrack_shouldWriteEmptyFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("empty.srt");

    SubtitleTrack::default().write_to_srt(&path)?;

    assert_eq!(std::fs::read_to_string(&path)?, "");
    Ok(())
}

/// Test that invalid cues are skipped when parsing
#[test]
fn test_parse_srt_string_withInvalidCue_shouldSkipIt() -> Result<()> {
    let content = "1\n00:00:05,000 --> 00:00:01,000\nbackwards\n\n2\n00:00:06,000 --> 00:00:07,000\nfine\n";
    let cues = SubtitleTrack::parse_srt_string(content)?;

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "fine");
    Ok(())
}
