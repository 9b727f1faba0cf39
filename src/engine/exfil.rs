//! Outbound web request checking
//!
//! WebSearch queries and WebFetch URLs are the easiest channels for an
//! agent to leak a credential, either verbatim or encoded in a parameter.

use crate::engine::common::{token_excerpt, BLOCKED_SUFFIX};
use crate::output::Decision;
use crate::parser::urls;
use crate::rules::{domain, entropy, secrets, ExfilConfig};

/// Check a WebSearch query: secret patterns, then entropy over the query
pub fn check_search(query: &str, config: &ExfilConfig) -> Decision {
    if config.is_empty() {
        return Decision::allow("no exfiltration indicators loaded");
    }

    if let Some(pattern) = secrets::scan(query, &config.secret_patterns) {
        return Decision::deny(
            "exfil-secret",
            format!(
                "Exfiltration guard: WebSearch query contains a suspected secret ({}). {}",
                pattern.description, BLOCKED_SUFFIX
            ),
        );
    }

    if let Some(token) = entropy::scan(query, config.entropy_threshold, config.entropy_min_length) {
        return Decision::deny(
            "exfil-entropy",
            format!(
                "Exfiltration guard: WebSearch query contains a high-entropy token ({}) that may encode secrets. {}",
                token_excerpt(token),
                BLOCKED_SUFFIX
            ),
        );
    }

    Decision::allow("search query passed exfiltration checks")
}

/// Check a WebFetch URL: host deny-list, secret patterns over the full URL,
/// then entropy over each query parameter value
pub fn check_fetch(url: &str, config: &ExfilConfig) -> Decision {
    if config.is_empty() {
        return Decision::allow("no exfiltration indicators loaded");
    }

    let parts = urls::parse(url);

    if let Some(hostname) = parts.hostname.as_deref() {
        if let Some(matched) = domain::match_domain(hostname, &config.suspicious_domains) {
            return Decision::deny(
                "exfil-domain",
                format!(
                    "Exfiltration guard: WebFetch URL targets suspicious domain ({}). {}",
                    matched, BLOCKED_SUFFIX
                ),
            );
        }
    }

    if let Some(pattern) = secrets::scan(url, &config.secret_patterns) {
        return Decision::deny(
            "exfil-secret",
            format!(
                "Exfiltration guard: WebFetch URL contains a suspected secret ({}). {}",
                pattern.description, BLOCKED_SUFFIX
            ),
        );
    }

    for (name, value) in &parts.query_params {
        if entropy::scan(value, config.entropy_threshold, config.entropy_min_length).is_some() {
            return Decision::deny(
                "exfil-entropy",
                format!(
                    "Exfiltration guard: WebFetch URL query param '{}' contains a high-entropy value that may encode secrets. {}",
                    name, BLOCKED_SUFFIX
                ),
            );
        }
    }

    Decision::allow("fetch URL passed exfiltration checks")
}
