//! Error types for code-guardian
//!
//! Errors never cross the hook boundary: loaders turn them into empty rule
//! sets and the binary turns anything else into an allow.

use thiserror::Error;

/// Errors raised while loading configuration and rule sources
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid regex {pattern:?}: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid glob {pattern:?}: {reason}")]
    Glob { pattern: String, reason: String },

    #[error("invalid rule {id:?}: {reason}")]
    InvalidRule { id: String, reason: String },
}

/// Result type for code-guardian operations
pub type Result<T> = std::result::Result<T, Error>;
