//! Parsing utilities for code-guardian
//!
//! Shell tokenization with host extraction, and fetch URL decomposition.

pub mod shell;
pub mod urls;
