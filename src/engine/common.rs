//! Common utilities for the inspection surfaces
//!
//! Truncation helpers shared by deny reasons, log summaries and the input
//! size cap.

/// Max chars of a flagged token repeated in a deny reason
pub const EXCERPT_CHARS: usize = 40;

/// Suffix appended to every outbound denial
pub const BLOCKED_SUFFIX: &str = "Blocked to prevent data leakage.";

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// `text` cut to `max_chars` with `...` when something was cut
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let truncated = truncate_chars(text, max_chars);
    if truncated.len() < text.len() {
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

/// Flagged-token excerpt for deny reasons; always elided so a full secret
/// is never echoed back
pub fn token_excerpt(token: &str) -> String {
    format!("{}...", truncate_chars(token, EXCERPT_CHARS))
}

/// Cap inspected text at `max_bytes`, on a char boundary
pub fn cap_input(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }

    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    tracing::debug!(len = text.len(), cap = max_bytes, "inspected text truncated");
    &text[..end]
}
