//! Content-write checking
//!
//! Validates text about to be written to a file against the content rule
//! set. Unlike the outbound surfaces this one collects every violation.

use crate::config::Severity;
use crate::output::Decision;
use crate::rules::matcher;
use crate::rules::ContentRule;

/// Check content about to land in `file_path`
pub fn check_content(
    content: &str,
    file_path: Option<&str>,
    rules: &[ContentRule],
    min_severity: Severity,
) -> Decision {
    if rules.is_empty() {
        return Decision::allow("no content rules loaded");
    }

    let violations = matcher::evaluate_all(content, rules, file_path, min_severity);
    if violations.is_empty() {
        return Decision::allow("content passed all rules");
    }

    tracing::debug!(
        count = violations.len(),
        file = file_path.unwrap_or("<unknown>"),
        "content violations"
    );
    Decision::deny_violations(violations)
}
