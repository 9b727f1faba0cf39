//! Configuration loading for code-guardian
//!
//! Supports TOML configuration with embedded defaults. The rule sources
//! themselves are JSON files under the plugin root; this file only says
//! where to find them and how hard to look.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::Result;

/// Environment variable naming the plugin root that holds the rule sources
pub const PLUGIN_ROOT_ENV: &str = "CLAUDE_PLUGIN_ROOT";

/// Rule severity, also used as the minimum severity gate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,

    #[default]
    Medium,

    High,

    Critical,
}

impl Severity {
    /// Check if a rule of `rule_level` is evaluated under this minimum
    pub fn includes(&self, rule_level: Severity) -> bool {
        rule_level >= *self
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity '{}'", s)),
        }
    }
}

/// Diagnostic log output format (always written to stderr)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// General configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Report denials as warnings instead of blocking
    pub warn_only: bool,

    /// Content rules below this severity are not evaluated
    pub min_severity: Severity,

    /// Format of diagnostics on stderr
    pub log_format: LogFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            warn_only: false,
            min_severity: Severity::Low,
            log_format: LogFormat::Pretty,
        }
    }
}

/// Rule source locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Directory the relative paths below resolve against
    pub plugin_root: Option<String>,

    /// Content anti-pattern rule set (JSON)
    pub content_rules: String,

    /// Exfiltration indicators (JSON)
    pub exfil_patterns: String,

    /// Optional allowlist (TOML)
    pub allowlist: Option<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            plugin_root: Some("~/.claude/code-guardian".to_string()),
            content_rules: "reference/anti-patterns.json".to_string(),
            exfil_patterns: "reference/exfil-patterns.json".to_string(),
            allowlist: Some("allow.toml".to_string()),
        }
    }
}

/// Bounds on the work a single inspection may do
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Inspected text is truncated to this many bytes
    pub max_input_bytes: usize,

    /// Compiled program size cap for each rule regex
    pub regex_size_limit: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 1_000_000,
            regex_size_limit: 1 << 20,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub rules: RulesConfig,
    pub limits: LimitsConfig,
}

impl Config {
    /// Load configuration from the standard locations or use defaults
    pub fn load() -> Self {
        let config_paths = [
            // User-specific config
            dirs::home_dir().map(|p| p.join(".claude/code-guardian/config.toml")),
            // System-wide config
            Some(PathBuf::from("/etc/code-guardian/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                    }
                }
            }
        }

        Config::default()
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Whether warn-only mode is on, from config or environment
    pub fn warn_only(&self) -> bool {
        self.general.warn_only || env::var("CODE_GUARDIAN_WARN_ONLY").is_ok()
    }

    /// Directory holding the rule sources; `$CLAUDE_PLUGIN_ROOT` wins
    pub fn plugin_root(&self) -> Option<PathBuf> {
        self.resolve_plugin_root(env::var(PLUGIN_ROOT_ENV).ok())
    }

    fn resolve_plugin_root(&self, from_env: Option<String>) -> Option<PathBuf> {
        from_env
            .filter(|root| !root.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.rules.plugin_root.as_deref().map(Self::expand_path))
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        let path = Self::expand_path(relative);
        if path.is_absolute() {
            return path;
        }
        match self.plugin_root() {
            Some(root) => root.join(path),
            None => path,
        }
    }

    /// Path of the content rule source (expanded)
    pub fn content_rules_path(&self) -> PathBuf {
        self.resolve(&self.rules.content_rules)
    }

    /// Path of the exfiltration config source (expanded)
    pub fn exfil_patterns_path(&self) -> PathBuf {
        self.resolve(&self.rules.exfil_patterns)
    }

    /// Path of the allowlist file (expanded)
    pub fn allowlist_path(&self) -> Option<PathBuf> {
        self.rules.allowlist.as_deref().map(|p| self.resolve(p))
    }
}
