//! Bash command exfiltration checking
//!
//! A command is only inspected for destinations and encoded payloads when
//! it invokes something capable of network egress (curl, wget, nc, dig, ...).
//! Matching an egress command alone never denies.

use crate::engine::common::{token_excerpt, BLOCKED_SUFFIX};
use crate::output::Decision;
use crate::parser::shell;
use crate::rules::{domain, entropy, secrets, ExfilConfig};

/// Check a bash command for exfiltration attempts
pub fn check_command(command: &str, config: &ExfilConfig) -> Decision {
    if config.is_empty() {
        return Decision::allow("no exfiltration indicators loaded");
    }

    // 1. Credentials anywhere in the command
    if let Some(pattern) = secrets::scan(command, &config.secret_patterns) {
        return Decision::deny(
            "exfil-secret",
            format!(
                "Exfiltration guard: Bash command contains a suspected secret ({}). {}",
                pattern.description, BLOCKED_SUFFIX
            ),
        );
    }

    // 2. Egress commands: destination, then payload
    let mut hosts: Option<Vec<String>> = None;
    for exfil_cmd in &config.bash_exfil_commands {
        if !exfil_cmd.regex.is_match(command) {
            continue;
        }

        let hosts = hosts.get_or_insert_with(|| shell::candidate_hosts(command));
        if let Some(matched) = domain::match_any(hosts.iter(), &config.suspicious_domains) {
            return Decision::deny(
                "exfil-domain",
                format!(
                    "Exfiltration guard: Bash command uses {} targeting suspicious domain ({}). {}",
                    exfil_cmd.description, matched, BLOCKED_SUFFIX
                ),
            );
        }

        if let Some(token) =
            entropy::scan(command, config.entropy_threshold, config.entropy_min_length)
        {
            return Decision::deny(
                "exfil-entropy",
                format!(
                    "Exfiltration guard: Bash command uses {} with a high-entropy argument ({}) that may encode secrets. {}",
                    exfil_cmd.description,
                    token_excerpt(token),
                    BLOCKED_SUFFIX
                ),
            );
        }
    }

    Decision::allow("command passed exfiltration checks")
}
