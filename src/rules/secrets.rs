//! Secret-pattern scanning for outbound text
//!
//! Patterns come from the exfiltration config; the first one that matches
//! is reported.

use crate::rules::NamedPattern;

/// First configured pattern that matches `text`
pub fn scan<'a>(text: &str, patterns: &'a [NamedPattern]) -> Option<&'a NamedPattern> {
    patterns.iter().find(|pattern| pattern.regex.is_match(text))
}

/// Redact secrets in text for logging
pub fn redact_secrets(text: &str, patterns: &[NamedPattern]) -> String {
    let mut redacted = text.to_string();

    for pattern in patterns {
        redacted = pattern.regex.replace_all(&redacted, "[REDACTED]").into_owned();
    }

    redacted
}
