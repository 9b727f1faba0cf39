//! Guard engine for code-guardian
//!
//! Routes one inspection request to the check sequence for its surface and
//! returns a single decision. Rule sources are read fresh for every engine;
//! nothing is cached across invocations.

pub mod bash;
pub mod common;
pub mod content;
pub mod exfil;

use std::env;

use crate::config::Config;
use crate::input::HookInput;
use crate::output::Decision;
use crate::rules::allowlist::CompiledAllowlist;
use crate::rules::store::RuleStore;
use crate::rules::{secrets, ExfilConfig, RuleSet};

/// Set to any value to allow everything without inspection
pub const DISABLED_ENV: &str = "CODE_GUARDIAN_DISABLED";

/// Inspection surface, used to scope allowlist entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Write,
    Search,
    Fetch,
    Bash,
}

/// A single candidate action to inspect
#[derive(Debug, Clone, PartialEq)]
pub enum InspectionRequest {
    /// Text about to be written; `file_path` scopes glob-filtered rules
    ContentWrite {
        content: String,
        file_path: Option<String>,
    },
    Search {
        query: String,
    },
    Fetch {
        url: String,
    },
    ShellCommand {
        command: String,
    },
}

impl InspectionRequest {
    pub fn surface(&self) -> Surface {
        match self {
            InspectionRequest::ContentWrite { .. } => Surface::Write,
            InspectionRequest::Search { .. } => Surface::Search,
            InspectionRequest::Fetch { .. } => Surface::Fetch,
            InspectionRequest::ShellCommand { .. } => Surface::Bash,
        }
    }

    /// The text the surface's checks run over
    pub fn text(&self) -> &str {
        match self {
            InspectionRequest::ContentWrite { content, .. } => content,
            InspectionRequest::Search { query } => query,
            InspectionRequest::Fetch { url } => url,
            InspectionRequest::ShellCommand { command } => command,
        }
    }
}

/// The main guard engine
pub struct GuardEngine {
    config: Config,
    content_rules: RuleSet,
    exfil: ExfilConfig,
    allowlist: CompiledAllowlist,
}

impl GuardEngine {
    /// Create an engine, loading every rule source named by `config`.
    /// Missing or malformed sources load as empty.
    pub fn load(config: Config) -> Self {
        let store = RuleStore::new(&config.limits);
        let content_rules = store.load_content_rules(&config.content_rules_path());
        let exfil = store.load_exfil_config(&config.exfil_patterns_path());
        let allowlist = CompiledAllowlist::load(config.allowlist_path().as_deref());

        for skipped in content_rules.skipped.iter().chain(exfil.skipped.iter()) {
            tracing::warn!(rule = %skipped.id, reason = %skipped.reason, "rule skipped");
        }

        Self {
            config,
            content_rules,
            exfil,
            allowlist,
        }
    }

    /// Create an engine over already-loaded rules, with an empty allowlist
    pub fn with_rules(config: Config, content_rules: RuleSet, exfil: ExfilConfig) -> Self {
        Self {
            config,
            content_rules,
            exfil,
            allowlist: CompiledAllowlist::empty(),
        }
    }

    /// Replace the allowlist
    pub fn with_allowlist(mut self, allowlist: CompiledAllowlist) -> Self {
        self.allowlist = allowlist;
        self
    }

    /// Check if the guard is disabled via environment
    pub fn is_disabled(&self) -> bool {
        env::var(DISABLED_ENV).is_ok()
    }

    /// Main entry point: check a hook input and return a decision
    pub fn check(&self, input: &HookInput) -> Decision {
        if self.is_disabled() {
            return Decision::allow(format!("disabled via {}", DISABLED_ENV));
        }

        let Some(request) = input.to_request() else {
            return Decision::allow("nothing to inspect");
        };

        let decision = self.decide(&request);

        if decision.is_deny() {
            tracing::info!(
                rule = decision.rule_id().unwrap_or_default(),
                input = %secrets::redact_secrets(&input.summary(), &self.exfil.secret_patterns),
                "denied"
            );
        }

        if self.config.warn_only() {
            return decision.into_warning();
        }

        decision
    }

    /// Run the check sequence for the request's surface
    pub fn decide(&self, request: &InspectionRequest) -> Decision {
        if let Some(reason) = self.allowlisted(request) {
            return Decision::allow(format!("allowlisted: {}", reason));
        }

        let max = self.config.limits.max_input_bytes;
        match request {
            InspectionRequest::ContentWrite { content, file_path } => content::check_content(
                common::cap_input(content, max),
                file_path.as_deref(),
                &self.content_rules.rules,
                self.config.general.min_severity,
            ),
            InspectionRequest::Search { query } => {
                exfil::check_search(common::cap_input(query, max), &self.exfil)
            }
            InspectionRequest::Fetch { url } => {
                exfil::check_fetch(common::cap_input(url, max), &self.exfil)
            }
            InspectionRequest::ShellCommand { command } => {
                bash::check_command(common::cap_input(command, max), &self.exfil)
            }
        }
    }

    /// Writes are allowlisted by path, everything else by its own text
    fn allowlisted(&self, request: &InspectionRequest) -> Option<&str> {
        let subject = match request {
            InspectionRequest::ContentWrite { file_path, .. } => file_path.as_deref()?,
            other => other.text(),
        };
        self.allowlist.matches(request.surface(), subject)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Content rules in evaluation order
    pub fn content_rules(&self) -> &RuleSet {
        &self.content_rules
    }

    /// Exfiltration indicators
    pub fn exfil_config(&self) -> &ExfilConfig {
        &self.exfil
    }
}
