/*!
 * Validation module for lyric input.
 *
 * Validators never stop at the first problem: every violation is collected
 * with its location so a single pass is enough to fix a request.
 *
 * # Architecture
 *
 * - `lrc`: Rules for raw LRC text
 * - `structure`: Rules for structured section lists
 * - `request`: Request-level rules (request id, duration)
 */

pub mod lrc;
pub mod request;
pub mod structure;

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::lyrics::{LyricSource, MalformedLinePolicy};

// Re-export main types
pub use request::request_errors;

/// Where a validation issue was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueLocation {
    /// 1-based line of raw LRC text
    Line(usize),
    /// 1-based section of a structured source
    Section(usize),
    /// 1-based line within a 1-based section
    SectionLine { section: usize, line: usize },
    /// A field of the request document
    Field(String),
}

impl fmt::Display for IssueLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueLocation::Line(n) => write!(f, "Line {}", n),
            IssueLocation::Section(n) => write!(f, "Section {}", n),
            IssueLocation::SectionLine { section, line } => {
                write!(f, "Section {}, line {}", section, line)
            }
            IssueLocation::Field(name) => write!(f, "Field '{}'", name),
        }
    }
}

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: IssueLocation,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(location: IssueLocation, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }

    /// Line number for raw LRC issues
    pub fn line_number(&self) -> Option<usize> {
        match self.location {
            IssueLocation::Line(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Outcome of validating a lyric source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// True when there are no errors (warnings do not count)
    pub ok: bool,
    /// Blocking issues, in input order
    pub errors: Vec<ValidationIssue>,
    /// Non-blocking issues, in input order
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    fn from_issues(errors: Vec<ValidationIssue>, warnings: Vec<ValidationIssue>) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Validation strictness. Upstream pipelines disagree on these rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Accept blank lines in raw LRC text
    #[serde(default = "default_true")]
    pub allow_blank_lines: bool,

    /// Reject lines with nothing after the timestamp
    #[serde(default)]
    pub require_text: bool,

    /// Reject sections whose start is earlier than the previous section's
    #[serde(default = "default_true")]
    pub check_section_order: bool,

    /// Whether malformed raw lines are errors or warnings
    #[serde(default)]
    pub malformed_lines: MalformedLinePolicy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allow_blank_lines: true,
            require_text: false,
            check_section_order: true,
            malformed_lines: MalformedLinePolicy::Reject,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Collects issues and sorts them into errors or warnings
pub(crate) struct IssueCollector {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl IssueCollector {
    fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, location: IssueLocation, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(location, message));
    }

    /// Record a malformed-line issue according to the policy
    pub(crate) fn malformed(
        &mut self,
        policy: MalformedLinePolicy,
        location: IssueLocation,
        message: impl Into<String>,
    ) {
        let issue = ValidationIssue::new(location, message);
        match policy {
            MalformedLinePolicy::Reject => self.errors.push(issue),
            MalformedLinePolicy::Skip => self.warnings.push(issue),
        }
    }

    fn finish(self) -> ValidationResult {
        ValidationResult::from_issues(self.errors, self.warnings)
    }
}

/// Validator for both lyric source forms
#[derive(Debug, Clone, Default)]
pub struct LyricValidator {
    config: ValidationConfig,
}

impl LyricValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a source and report every violation. Never fails.
    pub fn validate(&self, source: &LyricSource) -> ValidationResult {
        let mut collector = IssueCollector::new();

        match source {
            LyricSource::RawLrc(text) => lrc::check_lrc(text, &self.config, &mut collector),
            LyricSource::Structured(sections) => {
                structure::check_sections(sections, &self.config, &mut collector)
            }
        }

        let result = collector.finish();
        debug!(
            "Lyric validation: {} errors, {} warnings",
            result.errors.len(),
            result.warnings.len()
        );
        result
    }
}

/// Shorten user content for messages
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
