/*!
 * Request-level rules: request id and duration policy.
 */

use regex::Regex;

use crate::app_config::RequestPolicy;
use crate::errors::RequestError;
use crate::request::RequestDocument;

/// Every request-level problem with the document, in field order
pub fn request_errors(request: &RequestDocument, policy: &RequestPolicy) -> Vec<RequestError> {
    let mut errors = Vec::new();

    let request_id = request.request_id.trim();
    let id_matches = match &policy.request_id_pattern {
        // An unparseable pattern is rejected by Config::validate
        Some(pattern) => Regex::new(pattern)
            .map(|re| re.is_match(request_id))
            .unwrap_or(false),
        None => true,
    };
    if request_id.is_empty() || !id_matches || has_path_separator(request_id) {
        errors.push(RequestError::InvalidRequestId(request.request_id.clone()));
    }

    let duration = request.duration_or(policy.default_duration);
    if !policy.duration.accepts(duration) {
        errors.push(RequestError::DurationOutOfRange {
            duration,
            policy: policy.duration.describe(),
        });
    }

    errors
}

// The id names files in the output directory
fn has_path_separator(request_id: &str) -> bool {
    request_id.contains(['/', '\\']) || request_id == "." || request_id == ".."
}
