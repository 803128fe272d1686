/*!
 * Rules for raw LRC text.
 *
 * - Blank lines are skipped unless the configuration forbids them
 * - Every other line must start with `[`
 * - The bracketed token must be exactly `MM:SS.CC` with seconds below 60
 * - Text after the timestamp may be empty unless `require_text` is set
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::{preview, IssueCollector, IssueLocation, ValidationConfig};
use crate::lyrics::RawLine;
use crate::timestamp::Timestamp;

static STRICT_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}\.\d{2}$").unwrap()
});

pub(crate) fn check_lrc(text: &str, config: &ValidationConfig, collector: &mut IssueCollector) {
    let policy = config.malformed_lines;

    for (idx, line) in text.lines().enumerate() {
        let location = IssueLocation::Line(idx + 1);

        match RawLine::classify(line) {
            RawLine::Blank => {
                if !config.allow_blank_lines {
                    collector.error(location, "Empty line detected");
                }
            }
            RawLine::NonLyric(content) => {
                collector.malformed(
                    policy,
                    location,
                    format!("Missing timestamp - '{}'", preview(content, 50)),
                );
            }
            RawLine::Unterminated(content) => {
                collector.malformed(
                    policy,
                    location,
                    format!("Timestamp bracket is never closed - '{}'", preview(content, 30)),
                );
            }
            RawLine::Lyric { token, text } => {
                if !STRICT_TOKEN_REGEX.is_match(token) {
                    collector.malformed(
                        policy,
                        location,
                        format!("Invalid timestamp format - '[{}]'", preview(token, 30)),
                    );
                    continue;
                }
                if let Err(e) = Timestamp::parse(token) {
                    collector.malformed(policy, location, e.to_string());
                    continue;
                }
                if config.require_text && text.is_empty() {
                    collector.error(location, "Empty text after timestamp");
                }
            }
        }
    }
}
