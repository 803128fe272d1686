use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::LyricError;

// @module: Lyric timestamp parsing and formatting

// @const: Bracket-free LRC timestamp (minutes may grow past two digits)
static LRC_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2})\.(\d{2})$").unwrap()
});

/// Offset from the start of a song, with centisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    centis: u64,
}

impl Timestamp {
    /// Song start
    pub const ZERO: Timestamp = Timestamp { centis: 0 };

    pub fn from_centis(centis: u64) -> Self {
        Self { centis }
    }

    /// Build a timestamp from milliseconds, rounded to the nearest centisecond
    pub fn from_millis(ms: u64) -> Self {
        Self { centis: ms.saturating_add(5) / 10 }
    }

    pub fn as_centis(&self) -> u64 {
        self.centis
    }

    pub fn as_millis(&self) -> u64 {
        self.centis.saturating_mul(10)
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.centis as f64 / 100.0
    }

    /// Shift forward by a millisecond offset (rounded to centiseconds)
    pub fn offset_by_millis(&self, ms: u64) -> Self {
        Self { centis: self.centis.saturating_add(ms.saturating_add(5) / 10) }
    }

    /// Parse a bracket-free `MM:SS.CC` token.
    ///
    /// Minutes and seconds must be zero-padded to two digits, centiseconds are
    /// exactly two digits, and seconds must stay below 60.
    pub fn parse(token: &str) -> Result<Self, LyricError> {
        let malformed = |reason: &str| LyricError::MalformedTimestamp {
            token: token.to_string(),
            reason: reason.to_string(),
        };

        let caps = LRC_TIMESTAMP_REGEX
            .captures(token)
            .ok_or_else(|| malformed("expected MM:SS.CC"))?;

        let minutes: u64 = caps[1]
            .parse()
            .map_err(|_| malformed("minutes out of range"))?;
        let seconds: u64 = caps[2]
            .parse()
            .map_err(|_| malformed("seconds are not numeric"))?;
        let centis: u64 = caps[3]
            .parse()
            .map_err(|_| malformed("centiseconds are not numeric"))?;

        if seconds >= 60 {
            return Err(malformed("seconds must be below 60"));
        }

        let total = minutes
            .checked_mul(6000)
            .and_then(|m| m.checked_add(seconds * 100 + centis))
            .ok_or_else(|| malformed("minutes out of range"))?;

        Ok(Self { centis: total })
    }

    /// Format as `MM:SS.CC`, the inverse of [`Timestamp::parse`]
    pub fn format(&self) -> String {
        let minutes = self.centis / 6000;
        let seconds = (self.centis % 6000) / 100;
        let centis = self.centis % 100;

        format!("{:02}:{:02}.{:02}", minutes, seconds, centis)
    }

    /// Format as an SRT cue time, `HH:MM:SS,mmm`
    pub fn format_subtitle(&self) -> String {
        let ms = self.as_millis();
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

impl FromStr for Timestamp {
    type Err = LyricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::parse(&token).map_err(serde::de::Error::custom)
    }
}
