//! Rule Store: loads both rule sources from disk
//!
//! Loading never fails from the caller's point of view. A missing source is
//! an empty rule set, a malformed one is an empty rule set plus a warning,
//! and a bad record is skipped on its own with the reason kept.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::Result;
use crate::rules::{
    ContentRule, ExfilConfig, NamedPattern, PatternRecord, RuleRecord, RuleSet, SkippedRule,
    DEFAULT_ENTROPY_MIN_LENGTH, DEFAULT_ENTROPY_THRESHOLD,
};

/// `{ "patterns": [...] }`
#[derive(Debug, Deserialize)]
struct ContentRuleSource {
    #[serde(default)]
    patterns: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExfilSource {
    secret_patterns: Vec<Value>,
    suspicious_domains: Vec<Value>,
    bash_exfil_commands: Vec<Value>,
    entropy_threshold: Option<Value>,
    entropy_min_length: Option<Value>,
}

/// Loader for content rules and exfiltration indicators
#[derive(Debug, Clone)]
pub struct RuleStore {
    regex_size_limit: usize,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new(&LimitsConfig::default())
    }
}

impl RuleStore {
    pub fn new(limits: &LimitsConfig) -> Self {
        Self {
            regex_size_limit: limits.regex_size_limit,
        }
    }

    /// Load content rules from `path`
    pub fn load_content_rules(&self, path: &Path) -> RuleSet {
        let Some(json) = read_source(path) else {
            return RuleSet::default();
        };

        self.parse_content_rules(&json).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "malformed content rule source");
            RuleSet::default()
        })
    }

    /// Parse a content rule source document
    pub fn parse_content_rules(&self, json: &str) -> Result<RuleSet> {
        let source: ContentRuleSource = serde_json::from_str(json)?;
        let mut set = RuleSet::default();
        let mut seen = HashSet::new();

        for (index, value) in source.patterns.into_iter().enumerate() {
            let label = record_label(&value, "id", index);

            let compiled = serde_json::from_value::<RuleRecord>(value)
                .map_err(crate::error::Error::from)
                .and_then(|record| ContentRule::compile(record, self.regex_size_limit));

            match compiled {
                Ok(rule) if !seen.insert(rule.id.clone()) => {
                    skip(&mut set.skipped, label, "duplicate id".to_string());
                }
                Ok(rule) => set.rules.push(rule),
                Err(e) => skip(&mut set.skipped, label, e.to_string()),
            }
        }

        tracing::debug!(
            loaded = set.rules.len(),
            skipped = set.skipped.len(),
            "content rules loaded"
        );
        Ok(set)
    }

    /// Load exfiltration indicators from `path`
    pub fn load_exfil_config(&self, path: &Path) -> ExfilConfig {
        let Some(json) = read_source(path) else {
            return ExfilConfig::default();
        };

        self.parse_exfil_config(&json).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "malformed exfiltration config");
            ExfilConfig::default()
        })
    }

    /// Parse an exfiltration config document
    pub fn parse_exfil_config(&self, json: &str) -> Result<ExfilConfig> {
        let document: Value = serde_json::from_str(json)?;
        let loaded = document.as_object().is_some_and(|o| !o.is_empty());
        let source: ExfilSource = serde_json::from_value(document)?;
        let mut skipped = Vec::new();

        let secret_patterns = self.compile_patterns(source.secret_patterns, &mut skipped);
        let bash_exfil_commands = self.compile_patterns(source.bash_exfil_commands, &mut skipped);

        let suspicious_domains = source
            .suspicious_domains
            .iter()
            .filter_map(|v| v.as_str())
            .filter_map(normalize_domain)
            .collect();

        let entropy_threshold = source
            .entropy_threshold
            .as_ref()
            .and_then(Value::as_f64)
            .filter(|t| t.is_finite() && *t >= 0.0)
            .unwrap_or(DEFAULT_ENTROPY_THRESHOLD);

        let entropy_min_length = source
            .entropy_min_length
            .as_ref()
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_ENTROPY_MIN_LENGTH);

        Ok(ExfilConfig {
            secret_patterns,
            suspicious_domains,
            bash_exfil_commands,
            entropy_threshold,
            entropy_min_length,
            skipped,
            loaded,
        })
    }

    fn compile_patterns(
        &self,
        values: Vec<Value>,
        skipped: &mut Vec<SkippedRule>,
    ) -> Vec<NamedPattern> {
        let mut patterns = Vec::with_capacity(values.len());

        for (index, value) in values.into_iter().enumerate() {
            let label = record_label(&value, "description", index);

            let compiled = serde_json::from_value::<PatternRecord>(value)
                .map_err(crate::error::Error::from)
                .and_then(|record| NamedPattern::compile(record, self.regex_size_limit));

            match compiled {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => skip(skipped, label, e.to_string()),
            }
        }

        patterns
    }
}

/// Read a rule source; `None` when it does not exist or cannot be read
fn read_source(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(json) => Some(json),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "rule source not found");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "rule source unreadable");
            None
        }
    }
}

fn record_label(value: &Value, key: &str, index: usize) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(String::from)
        .unwrap_or_else(|| format!("#{}", index))
}

fn skip(skipped: &mut Vec<SkippedRule>, id: String, reason: String) {
    tracing::warn!(rule = %id, reason = %reason, "skipping rule");
    skipped.push(SkippedRule { id, reason });
}

fn normalize_domain(domain: &str) -> Option<String> {
    let domain = domain.trim().trim_matches('.').to_lowercase();
    (!domain.is_empty()).then_some(domain)
}
