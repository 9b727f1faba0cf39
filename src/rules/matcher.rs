//! Pattern Matcher: evaluates one content rule against a content body
//!
//! Exclusion is by count, not by position: when the exclude pattern matches
//! at least as often as the rule pattern, every occurrence is assumed to be
//! one of the excluded ones. Both counts are taken without multi-line
//! mode, so `^` and `$` only anchor at the ends of the content.

use crate::config::Severity;
use crate::rules::{ContentRule, Violation};

/// Last path component, for either separator
pub fn basename(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path)
}

/// Whether `rule` applies to the file being written
pub fn applies_to(rule: &ContentRule, file_path: Option<&str>) -> bool {
    if rule.file_globs.is_empty() {
        return true;
    }

    match file_path.filter(|p| !p.is_empty()) {
        Some(path) => {
            let name = basename(path);
            rule.file_globs.iter().any(|glob| glob.matches(name))
        }
        // Unknown path: no basis for filtering
        None => true,
    }
}

/// Whether the exclude pattern covers every match of the rule pattern
pub fn is_suppressed(rule: &ContentRule, content: &str) -> bool {
    let Some(exclude) = &rule.exclude_pattern else {
        return false;
    };

    let counter = rule.count_pattern.as_ref().unwrap_or(&rule.pattern);
    let excluded = exclude.find_iter(content).count();
    let matched = counter.find_iter(content).count();
    excluded >= matched
}

/// Evaluate a single rule
pub fn evaluate(content: &str, rule: &ContentRule, file_path: Option<&str>) -> Option<Violation> {
    if !applies_to(rule, file_path) || is_suppressed(rule, content) {
        return None;
    }

    rule.pattern.is_match(content).then(|| Violation {
        id: rule.id.clone(),
        message: rule.message.clone(),
        suggestion: rule.suggestion.clone(),
        severity: rule.severity,
    })
}

/// Evaluate every rule at or above `min_severity`, in rule order
pub fn evaluate_all(
    content: &str,
    rules: &[ContentRule],
    file_path: Option<&str>,
    min_severity: Severity,
) -> Vec<Violation> {
    rules
        .iter()
        .filter(|rule| min_severity.includes(rule.severity))
        .filter_map(|rule| evaluate(content, rule, file_path))
        .collect()
}
