use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::file_utils::FileManager;
use crate::timestamp::Timestamp;

// @module: Subtitle cues and SRT serialization

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2,}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2,}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

// @struct: Single timed subtitle cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCue {
    // @field: 1-based sequence number
    pub index: usize,

    // @field: Start time
    pub start: Timestamp,

    // @field: End time, always after start
    pub end: Timestamp,

    // @field: Display text
    pub text: String,
}

impl SubtitleCue {
    /// Creates a new cue without checks - used by tests and the compiler
    pub fn new(index: usize, start: Timestamp, end: Timestamp, text: String) -> Self {
        SubtitleCue {
            index,
            start,
            end,
            text,
        }
    }

    // @creates: Validated cue
    // @validates: Time range and non-empty text
    pub fn new_validated(index: usize, start: Timestamp, end: Timestamp, text: String) -> Result<Self> {
        if end <= start {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end.format_subtitle(),
                start.format_subtitle()
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty subtitle text for cue {}", index));
        }

        Ok(SubtitleCue {
            index,
            start,
            end,
            text: trimmed_text.to_string(),
        })
    }

    /// Cue length in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end.as_millis().saturating_sub(self.start.as_millis())
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        self.start.format_subtitle()
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        self.end.format_subtitle()
    }

    /// Parse an SRT timestamp (`HH:MM:SS,mmm`)
    pub fn parse_timestamp(timestamp: &str) -> Result<Timestamp> {
        let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(Timestamp::from_millis(
            hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis,
        ))
    }
}

impl fmt::Display for SubtitleCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// An ordered list of cues forming one subtitle artifact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub cues: Vec<SubtitleCue>,
}

impl SubtitleTrack {
    pub fn new(cues: Vec<SubtitleCue>) -> Self {
        SubtitleTrack { cues }
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Render the whole track in SRT form. An empty track renders as "".
    pub fn to_srt_string(&self) -> String {
        self.cues.iter().map(|cue| cue.to_string()).collect()
    }

    /// Write the track to an SRT file.
    ///
    /// The content goes to a temporary file next to the target and is moved
    /// into place once fully flushed, so readers never see a partial file.
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        FileManager::ensure_dir(parent)?;

        let mut file = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temporary file in: {}", parent.display()))?;
        file.write_all(self.to_srt_string().as_bytes())
            .with_context(|| format!("Failed to write subtitle content for: {}", path.display()))?;
        file.as_file()
            .sync_all()
            .with_context(|| format!("Failed to flush subtitle file: {}", path.display()))?;
        file.persist(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        debug!("Wrote {} cues to {}", self.cues.len(), path.display());
        Ok(())
    }

    /// Parse an SRT file back into a track
    pub fn read_srt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        Ok(Self::new(Self::parse_srt_string(&content)?))
    }

    /// Parse SRT format string into cues. Empty input yields no cues.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleCue>> {
        let mut cues = Vec::new();

        // State variables for parsing
        let mut current_index: Option<usize> = None;
        let mut current_times: Option<(Timestamp, Timestamp)> = None;
        let mut current_text = String::new();

        let mut add_current_cue = |index: usize, times: (Timestamp, Timestamp), text: &str| {
            match SubtitleCue::new_validated(index, times.0, times.1, text.to_string()) {
                Ok(cue) => cues.push(cue),
                Err(e) => warn!("Skipping invalid subtitle cue {}: {}", index, e),
            }
        };

        for (line_idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if let (Some(index), Some(times)) = (current_index, current_times) {
                    if !current_text.is_empty() {
                        add_current_cue(index, times, &current_text);
                        current_index = None;
                        current_times = None;
                        current_text.clear();
                    }
                }
                continue;
            }

            if current_index.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_index = Some(num);
                    continue;
                }
            }

            if current_index.is_some() && current_times.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    let start = Self::parse_captured_time(&caps, 1)?;
                    let end = Self::parse_captured_time(&caps, 5)?;
                    current_times = Some((start, end));
                    continue;
                }
            }

            if current_index.is_some() && current_times.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                warn!(
                    "Unexpected text at line {} before sequence number or timestamp: {}",
                    line_idx + 1,
                    trimmed
                );
            }
        }

        if let (Some(index), Some(times)) = (current_index, current_times) {
            if !current_text.is_empty() {
                add_current_cue(index, times, &current_text);
            }
        }

        Ok(cues)
    }

    fn parse_captured_time(caps: &regex::Captures, start_idx: usize) -> Result<Timestamp> {
        let text = format!(
            "{}:{}:{},{}",
            &caps[start_idx],
            &caps[start_idx + 1],
            &caps[start_idx + 2],
            &caps[start_idx + 3]
        );
        SubtitleCue::parse_timestamp(&text)
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_srt_string())
    }
}
