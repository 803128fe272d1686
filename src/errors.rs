/*!
 * Error types for the lyricsub library.
 *
 * This module contains custom error types for the different stages of the
 * lyric-to-subtitle pipeline, using the thiserror crate for ergonomic
 * error definitions.
 */

use thiserror::Error;

use crate::validation::ValidationIssue;

/// Errors raised while reading, normalizing or compiling lyric timelines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LyricError {
    /// A timestamp token could not be parsed as `MM:SS.CC`
    #[error("Malformed timestamp '{token}': {reason}")]
    MalformedTimestamp {
        /// The offending token, without brackets
        token: String,
        /// Why the token was rejected
        reason: String,
    },

    /// A raw lyric line opens a timestamp bracket but never closes it
    #[error("Line {line_number}: timestamp bracket is never closed")]
    UnterminatedTimestamp {
        /// 1-based line number in the raw text
        line_number: usize,
    },

    /// The request carries neither raw lyrics nor a section structure
    #[error("Request has neither 'lyrics' nor 'structure'")]
    MissingLyricSource,

    /// The request carries both raw lyrics and a section structure
    #[error("Request has both 'lyrics' and 'structure'; exactly one is allowed")]
    AmbiguousLyricSource,

    /// A structured section is missing its type or its lines
    #[error("Section {index}: {reason}")]
    EmptySection {
        /// 1-based section index
        index: usize,
        /// What is missing
        reason: String,
    },

    /// The timeline handed to the compiler goes backwards
    #[error("Timeline is not ordered: line {position} at {current} comes after {previous}")]
    NonMonotonicTimeline {
        /// 1-based position of the offending line in the sequence
        position: usize,
        /// Timestamp of the preceding line
        previous: String,
        /// Timestamp of the offending line
        current: String,
    },

    /// Validation found one or more blocking issues
    #[error("Validation failed with {} issue(s):\n{}", .0.len(), format_issues(.0))]
    ValidationFailed(Vec<ValidationIssue>),
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors in the request document itself, outside of the lyric content
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    /// The document is not valid JSON or does not match the expected shape
    #[error("Failed to parse request document: {0}")]
    Parse(String),

    /// The request id is empty or does not match the configured pattern
    #[error("Invalid request id: '{0}'")]
    InvalidRequestId(String),

    /// The requested duration is not accepted by the configured policy
    #[error("Duration {duration}s is not accepted (expected {policy})")]
    DurationOutOfRange {
        /// Requested duration in seconds
        duration: u32,
        /// Human readable policy description
        policy: String,
    },
}

impl RequestError {
    /// Name of the request field the error is about
    pub fn field(&self) -> &'static str {
        match self {
            Self::Parse(_) => "request",
            Self::InvalidRequestId(_) => "request_id",
            Self::DurationOutOfRange { .. } => "duration",
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from lyric processing
    #[error("Lyric error: {0}")]
    Lyric(#[from] LyricError),

    /// Error in the request document
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// The external media encoder failed
    #[error("Encoder error: {0}")]
    Encoder(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
