/*!
 * Lyric data model and source normalization.
 *
 * A song's lyrics arrive either as raw LRC text (one `[MM:SS.CC] text` line
 * per lyric) or as a list of sections with a start offset each. Both are
 * turned into one ordered sequence of timed [`LyricLine`]s here.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::app_config::TimingConfig;
use crate::errors::LyricError;
use crate::timestamp::Timestamp;

/// One timed lyric line. Empty text marks silence or an instrumental break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricLine {
    pub timestamp: Timestamp,
    pub text: String,
}

impl LyricLine {
    pub fn new(timestamp: Timestamp, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }

    /// Whether this line only marks silence
    pub fn is_silence(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A structured group of lyric lines (verse, chorus, ...) with one start offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section kind such as "verse" or "chorus"
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Start offset as an `MM:SS.CC` token. When absent the section
    /// continues right after the previous one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    /// Lyric lines, in singing order
    #[serde(default)]
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(kind: &str, start: Option<&str>, lines: &[&str]) -> Self {
        Self {
            kind: kind.to_string(),
            start: start.map(str::to_string),
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// The authoritative lyric input of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricSource {
    /// LRC text, one timestamped line per lyric
    RawLrc(String),
    /// Ordered list of sections
    Structured(Vec<Section>),
}

/// What to do with raw lines that look like lyrics but carry a broken timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Report the line and block generation
    #[default]
    Reject,
    /// Drop the line, but keep a record of it
    Skip,
}

/// Classification of a single raw LRC line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLine<'a> {
    /// Empty after trimming
    Blank,
    /// Does not start with `[` (section headers, notes, ...)
    NonLyric(&'a str),
    /// Starts with `[` but has no closing `]`
    Unterminated(&'a str),
    /// Bracketed token and the trimmed text after it
    Lyric { token: &'a str, text: &'a str },
}

impl<'a> RawLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return RawLine::Blank;
        }
        if !trimmed.starts_with('[') {
            return RawLine::NonLyric(trimmed);
        }
        match trimmed.find(']') {
            Some(close) => RawLine::Lyric {
                token: &trimmed[1..close],
                text: trimmed[close + 1..].trim(),
            },
            None => RawLine::Unterminated(trimmed),
        }
    }
}

/// A raw line the normalizer dropped under [`MalformedLinePolicy::Skip`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the raw text
    pub line_number: usize,
    /// The trimmed line content
    pub content: String,
    /// Why it was dropped
    pub reason: String,
}

/// Output of normalization: the timeline plus any lines that were dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedLyrics {
    pub lines: Vec<LyricLine>,
    pub skipped: Vec<SkippedLine>,
}

impl NormalizedLyrics {
    /// 1-based positions of lines whose timestamp is earlier than the line before
    pub fn ordering_violations(&self) -> Vec<usize> {
        self.lines
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[1].timestamp < pair[0].timestamp)
            .map(|(i, _)| i + 2)
            .collect()
    }

    pub fn is_monotonic(&self) -> bool {
        self.ordering_violations().is_empty()
    }
}

/// Turns a [`LyricSource`] into an ordered sequence of [`LyricLine`]s
#[derive(Debug, Clone, Default)]
pub struct LyricNormalizer {
    timing: TimingConfig,
    malformed_lines: MalformedLinePolicy,
}

impl LyricNormalizer {
    pub fn new(timing: TimingConfig, malformed_lines: MalformedLinePolicy) -> Self {
        Self {
            timing,
            malformed_lines,
        }
    }

    /// Normalize either source form. Input order is preserved; checking that
    /// the result is monotonic is left to the caller.
    pub fn normalize(&self, source: &LyricSource) -> Result<NormalizedLyrics, LyricError> {
        match source {
            LyricSource::RawLrc(text) => self.normalize_raw(text),
            LyricSource::Structured(sections) => Ok(NormalizedLyrics {
                lines: self.normalize_sections(sections)?,
                skipped: Vec::new(),
            }),
        }
    }

    fn normalize_raw(&self, text: &str) -> Result<NormalizedLyrics, LyricError> {
        let mut normalized = NormalizedLyrics::default();

        for (idx, line) in text.lines().enumerate() {
            let line_number = idx + 1;
            let error = match RawLine::classify(line) {
                RawLine::Blank => continue,
                RawLine::NonLyric(content) => {
                    debug!("Dropping non-lyric line {}: {}", line_number, content);
                    continue;
                }
                RawLine::Unterminated(_) => LyricError::UnterminatedTimestamp { line_number },
                RawLine::Lyric { token, text } => match Timestamp::parse(token) {
                    Ok(timestamp) => {
                        normalized.lines.push(LyricLine::new(timestamp, text));
                        continue;
                    }
                    Err(e) => e,
                },
            };

            match self.malformed_lines {
                MalformedLinePolicy::Reject => return Err(error),
                MalformedLinePolicy::Skip => {
                    warn!("Skipping malformed lyric line {}: {}", line_number, error);
                    normalized.skipped.push(SkippedLine {
                        line_number,
                        content: line.trim().to_string(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        debug!(
            "Normalized raw lyrics: {} lines kept, {} skipped",
            normalized.lines.len(),
            normalized.skipped.len()
        );

        Ok(normalized)
    }

    fn normalize_sections(&self, sections: &[Section]) -> Result<Vec<LyricLine>, LyricError> {
        let spacing_ms = self.timing.line_spacing_ms;
        let mut lines = Vec::new();
        let mut cursor = Timestamp::ZERO;

        for (idx, section) in sections.iter().enumerate() {
            if section.kind.trim().is_empty() {
                return Err(LyricError::EmptySection {
                    index: idx + 1,
                    reason: "section type is empty".to_string(),
                });
            }
            if section.lines.is_empty() {
                return Err(LyricError::EmptySection {
                    index: idx + 1,
                    reason: "section has no lines".to_string(),
                });
            }

            let base = match &section.start {
                Some(token) => Timestamp::parse(token.trim())?,
                None => cursor,
            };

            for (i, text) in section.lines.iter().enumerate() {
                let timestamp = base.offset_by_millis((i as u64).saturating_mul(spacing_ms));
                lines.push(LyricLine::new(timestamp, join_line_breaks(text)));
                cursor = timestamp.offset_by_millis(spacing_ms);
            }
        }

        debug!("Normalized {} sections into {} lines", sections.len(), lines.len());

        Ok(lines)
    }
}

/// Collapse embedded line breaks into single spaces so a line stays one cue
pub(crate) fn join_line_breaks(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
