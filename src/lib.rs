//! code-guardian - Pre-write validation and exfiltration guard for Claude Code hooks
//!
//! This library decides whether a tool call should proceed. Content about to
//! be written is checked against a corpus of anti-pattern rules, and outbound
//! searches, fetches and shell commands are checked for leaked credentials.
//!
//! # Features
//!
//! - **Content validation**: regex rules with exclusion suppression and basename glob scoping
//! - **Secret patterns**: known credential formats in queries, URLs and commands
//! - **Entropy analysis**: flags base64/hex-like tokens that plain patterns miss
//! - **Domain deny-list**: exact and subdomain matching for fetch and egress commands
//! - **Fail-open**: missing rules, bad input and internal faults never block
//! - **Allowlist support**: user-defined exceptions per surface
//!
//! # Example
//!
//! ```
//! use code_guardian::{Config, GuardEngine, HookInput};
//! use code_guardian::rules::store::RuleStore;
//!
//! let store = RuleStore::default();
//! let rules = store
//!     .parse_content_rules(r#"{"patterns":[{"id":"pydantic_dict","pattern":"\\.dict\\(\\)","message":"Use .model_dump()","file_globs":["*.py"]}]}"#)
//!     .unwrap();
//! let engine = GuardEngine::with_rules(Config::default(), rules, Default::default());
//!
//! let input = r#"{"tool_name":"Write","tool_input":{"file_path":"models.py","content":"x = 1.dict()"}}"#;
//! let hook_input = HookInput::from_json(input).unwrap();
//!
//! let decision = engine.check(&hook_input);
//! assert!(decision.is_deny());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod logging;
pub mod output;
pub mod parser;
pub mod rules;

// Re-exports for convenience
pub use config::{Config, Severity};
pub use engine::{GuardEngine, InspectionRequest};
pub use error::{Error, Result};
pub use input::{HookInput, ToolInput};
pub use output::{Decision, HookOutput};
