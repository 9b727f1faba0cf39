//! Allowlist handling for bypassing guard checks
//!
//! Supports user-defined patterns that let a specific write, query, URL or
//! command through without inspection.

use regex::Regex;
use serde::Deserialize;
use std::path::Path;

use crate::engine::Surface;
use crate::error::{Error, Result};

/// An allowlist entry
#[derive(Debug, Clone, Deserialize)]
pub struct AllowEntry {
    /// Regex pattern matched against the inspected text (file path for writes)
    pub pattern: String,

    /// Human-readable reason for allowing
    pub reason: String,

    /// Optional surface restriction: write, search, fetch, bash or *
    #[serde(default)]
    pub surface: Option<String>,
}

/// The allowlist configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AllowlistConfig {
    /// List of allowed patterns
    #[serde(default)]
    pub allow: Vec<AllowEntry>,
}

/// Compiled allowlist for efficient matching
#[derive(Debug, Default)]
pub struct CompiledAllowlist {
    /// General patterns (apply to every surface)
    general: Vec<(Regex, String)>,

    write: Vec<(Regex, String)>,
    search: Vec<(Regex, String)>,
    fetch: Vec<(Regex, String)>,
    bash: Vec<(Regex, String)>,
}

impl CompiledAllowlist {
    /// Create an empty allowlist
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and compile allowlist from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AllowlistConfig = toml::from_str(&content)?;
        Self::from_config(&config)
    }

    /// Load if present; a missing or broken file is an empty allowlist
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.filter(|p| p.exists()) else {
            return Self::empty();
        };

        Self::from_file(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring allowlist");
            Self::empty()
        })
    }

    /// Compile from config
    pub fn from_config(config: &AllowlistConfig) -> Result<Self> {
        let mut allowlist = Self::empty();

        for entry in &config.allow {
            let regex = Regex::new(&entry.pattern).map_err(|source| Error::Regex {
                pattern: entry.pattern.clone(),
                source,
            })?;
            let item = (regex, entry.reason.clone());

            match entry.surface.as_deref().map(str::to_lowercase).as_deref() {
                Some("write") => allowlist.write.push(item),
                Some("search") => allowlist.search.push(item),
                Some("fetch") => allowlist.fetch.push(item),
                Some("bash") => allowlist.bash.push(item),
                None | Some("*") => allowlist.general.push(item),
                Some(other) => {
                    tracing::warn!(surface = other, "unknown surface in allowlist, applying to all");
                    allowlist.general.push(item);
                }
            }
        }

        Ok(allowlist)
    }

    /// Check if `input` is allowlisted for `surface`
    pub fn matches(&self, surface: Surface, input: &str) -> Option<&str> {
        let surface_patterns = match surface {
            Surface::Write => &self.write,
            Surface::Search => &self.search,
            Surface::Fetch => &self.fetch,
            Surface::Bash => &self.bash,
        };

        surface_patterns
            .iter()
            .chain(self.general.iter())
            .find(|(regex, _)| regex.is_match(input))
            .map(|(_, reason)| reason.as_str())
    }
}
