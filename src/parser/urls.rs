//! URL parsing for fetch requests

use ::url::{form_urlencoded, Url};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::shell::authority_host;

/// Dotted hostname with no path, space or scheme characters
static HOST_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$").expect("static regex")
});

/// The parts of a fetch URL the guard inspects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    /// Lowercased host, if the URL has one
    pub hostname: Option<String>,

    /// Percent-decoded query parameters, in order of appearance
    pub query_params: Vec<(String, String)>,
}

/// Split `raw` into host and query parameters
pub fn parse(raw: &str) -> UrlParts {
    let raw = raw.trim();
    let Ok(url) = Url::parse(raw) else {
        return parse_lenient(raw);
    };

    let hostname = url
        .host_str()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_lowercase())
        .filter(|h| !h.is_empty());

    let query_params = url
        .query_pairs()
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    UrlParts {
        hostname,
        query_params,
    }
}

/// Schemeless or otherwise rejected URLs (`example.com/?token=...`).
/// The query is still decoded; the leading segment counts as a host only
/// when it looks like one.
fn parse_lenient(raw: &str) -> UrlParts {
    let without_fragment = raw.split('#').next().unwrap_or(raw);
    let (location, query) = match without_fragment.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (without_fragment, None),
    };

    let hostname = location
        .split('/')
        .next()
        .map(authority_host)
        .filter(|host| HOST_LIKE.is_match(host))
        .map(str::to_lowercase);

    let query_params = query
        .map(|q| {
            form_urlencoded::parse(q.as_bytes())
                .map(|(name, value)| (name.into_owned(), value.into_owned()))
                .collect()
        })
        .unwrap_or_default();

    UrlParts {
        hostname,
        query_params,
    }
}
