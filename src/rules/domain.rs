//! Domain Matcher: deny-list lookup by exact domain or proper subdomain

/// First deny-list entry that `hostname` equals or is a subdomain of
pub fn match_domain<'a>(hostname: &str, deny_list: &'a [String]) -> Option<&'a str> {
    let hostname = hostname.trim_end_matches('.').to_lowercase();
    if hostname.is_empty() {
        return None;
    }

    deny_list
        .iter()
        .find(|domain| {
            let domain = domain.to_lowercase();
            hostname == domain
                || hostname
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
        .map(String::as_str)
}

/// Check every candidate host in order; first hit wins
pub fn match_any<'a, I, S>(hosts: I, deny_list: &'a [String]) -> Option<&'a str>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    hosts
        .into_iter()
        .find_map(|host| match_domain(host.as_ref(), deny_list))
}
