//! Rule data model for code-guardian
//!
//! Rule records are read from JSON, validated, and compiled once per
//! invocation. Nothing here outlives a single inspection.

pub mod allowlist;
pub mod domain;
pub mod entropy;
pub mod matcher;
pub mod secrets;
pub mod store;

use glob::Pattern;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::config::Severity;
use crate::error::{Error, Result};

/// Default minimum bits per character for an entropy flag
pub const DEFAULT_ENTROPY_THRESHOLD: f64 = 4.0;

/// Default minimum token length eligible for entropy scoring
pub const DEFAULT_ENTROPY_MIN_LENGTH: usize = 20;

/// A content anti-pattern rule as written in the rule source
#[derive(Debug, Clone, Deserialize)]
pub struct RuleRecord {
    pub id: String,
    pub pattern: String,
    pub message: String,

    #[serde(default)]
    pub suggestion: Option<String>,

    #[serde(default)]
    pub severity: Option<Severity>,

    #[serde(default)]
    pub file_globs: Option<Vec<String>>,

    /// Extension list (".py"), converted to `*.py` globs
    #[serde(default)]
    pub file_types: Option<Vec<String>>,

    #[serde(default)]
    pub exclude_pattern: Option<String>,
}

/// A compiled content rule
#[derive(Debug, Clone)]
pub struct ContentRule {
    pub id: String,
    pub pattern: Regex,
    pub exclude_pattern: Option<Regex>,
    /// `pattern` without multi-line mode, counted against `exclude_pattern`
    pub count_pattern: Option<Regex>,
    pub message: String,
    pub suggestion: Option<String>,
    pub severity: Severity,
    /// Basename globs; empty means the rule applies to any file
    pub file_globs: Vec<Pattern>,
}

impl ContentRule {
    /// Validate and compile a record
    pub fn compile(record: RuleRecord, size_limit: usize) -> Result<Self> {
        if record.id.trim().is_empty() {
            return Err(Error::InvalidRule {
                id: record.id,
                reason: "empty id".to_string(),
            });
        }

        let pattern = compile_regex(&record.pattern, true, true, size_limit)?;
        let exclude_pattern = record
            .exclude_pattern
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| compile_regex(p, true, false, size_limit))
            .transpose()?;
        let count_pattern = exclude_pattern
            .as_ref()
            .map(|_| compile_regex(&record.pattern, true, false, size_limit))
            .transpose()?;

        let globs = record.file_globs.unwrap_or_default().into_iter().chain(
            record
                .file_types
                .unwrap_or_default()
                .into_iter()
                .map(|ext| format!("*.{}", ext.trim_start_matches('.'))),
        );
        let file_globs = globs
            .filter(|g| !g.is_empty())
            .map(|g| {
                Pattern::new(&g).map_err(|e| Error::Glob {
                    pattern: g.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: record.id,
            pattern,
            exclude_pattern,
            count_pattern,
            message: record.message,
            suggestion: record.suggestion.filter(|s| !s.is_empty()),
            severity: record.severity.unwrap_or_default(),
            file_globs,
        })
    }
}

/// A single rule match against a content body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub severity: Severity,
}

impl Violation {
    /// `[id] message` plus an indented suggestion line
    pub fn describe(&self) -> String {
        match &self.suggestion {
            Some(suggestion) => format!("[{}] {}\n  Suggestion: {}", self.id, self.message, suggestion),
            None => format!("[{}] {}", self.id, self.message),
        }
    }
}

/// A rule record rejected at load time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRule {
    pub id: String,
    pub reason: String,
}

/// Loaded content rules in source order
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub rules: Vec<ContentRule>,
    pub skipped: Vec<SkippedRule>,
}

impl RuleSet {
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// `{pattern, description}` entry of the exfiltration config
#[derive(Debug, Clone, Deserialize)]
pub struct PatternRecord {
    pub pattern: String,
    pub description: String,
}

/// A compiled regex with the description shown in deny reasons
#[derive(Debug, Clone)]
pub struct NamedPattern {
    pub regex: Regex,
    pub description: String,
}

impl NamedPattern {
    pub fn compile(record: PatternRecord, size_limit: usize) -> Result<Self> {
        Ok(Self {
            regex: compile_regex(&record.pattern, false, false, size_limit)?,
            description: record.description,
        })
    }
}

/// Exfiltration indicators
#[derive(Debug, Clone)]
pub struct ExfilConfig {
    pub secret_patterns: Vec<NamedPattern>,
    /// Lowercased domain suffixes, in source order
    pub suspicious_domains: Vec<String>,
    pub bash_exfil_commands: Vec<NamedPattern>,
    pub entropy_threshold: f64,
    pub entropy_min_length: usize,
    pub skipped: Vec<SkippedRule>,
    /// Set when the source was a non-empty document
    pub loaded: bool,
}

impl Default for ExfilConfig {
    fn default() -> Self {
        Self {
            secret_patterns: Vec::new(),
            suspicious_domains: Vec::new(),
            bash_exfil_commands: Vec::new(),
            entropy_threshold: DEFAULT_ENTROPY_THRESHOLD,
            entropy_min_length: DEFAULT_ENTROPY_MIN_LENGTH,
            skipped: Vec::new(),
            loaded: false,
        }
    }
}

impl ExfilConfig {
    /// Missing, malformed or `{}` source: every outbound request is allowed.
    /// A loaded source with empty lists still runs the entropy checks.
    pub fn is_empty(&self) -> bool {
        !self.loaded
    }
}

/// Compile a rule expression with the linear-time engine
pub fn compile_regex(
    pattern: &str,
    case_insensitive: bool,
    multi_line: bool,
    size_limit: usize,
) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .multi_line(multi_line)
        .size_limit(size_limit)
        .build()
        .map_err(|source| Error::Regex {
            pattern: pattern.to_string(),
            source,
        })
}
