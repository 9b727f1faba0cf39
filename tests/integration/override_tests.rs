//! Integration tests for override mechanisms
//!
//! Several tests mutate process environment variables, so every test in this
//! file holds `ENV_LOCK` for its whole duration.

use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use code_guardian::config::PLUGIN_ROOT_ENV;
use code_guardian::engine::DISABLED_ENV;
use code_guardian::{Config, Decision, GuardEngine, HookInput, HookOutput, Severity};
use serde_json::Value;
use tempfile::TempDir;

const WARN_ONLY_ENV: &str = "CODE_GUARDIAN_WARN_ONLY";

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn reference_config() -> Config {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("reference");
    let mut config = Config::default();
    config.rules.plugin_root = None;
    config.rules.content_rules = root.join("anti-patterns.json").display().to_string();
    config.rules.exfil_patterns = root.join("exfil-patterns.json").display().to_string();
    config.rules.allowlist = None;
    config
}

fn fetch_evil() -> HookInput {
    HookInput::from_json(r#"{"tool_name":"WebFetch","tool_input":{"url":"https://webhook.site/x"}}"#)
        .unwrap()
}

fn write_dict(path: &str) -> HookInput {
    let json = format!(
        r#"{{"tool_name":"Write","tool_input":{{"file_path":"{}","content":"x = m.dict()"}}}}"#,
        path
    );
    HookInput::from_json(&json).unwrap()
}

// ============================================================================
// CODE_GUARDIAN_DISABLED
// ============================================================================

#[test]
fn test_disabled_allows_everything() {
    let _guard = lock_env();
    let engine = GuardEngine::load(reference_config());
    assert!(engine.check(&fetch_evil()).is_deny());

    env::set_var(DISABLED_ENV, "1");
    let decision = engine.check(&fetch_evil());
    env::remove_var(DISABLED_ENV);

    assert!(decision.is_allow());
    assert!(decision.reason().contains(DISABLED_ENV));
}

// ============================================================================
// Warn-only
// ============================================================================

#[test]
fn test_warn_only_config_converts_deny_to_warn() {
    let _guard = lock_env();
    let mut config = reference_config();
    config.general.warn_only = true;
    let engine = GuardEngine::load(config);

    let input = fetch_evil();
    let decision = engine.check(&input);
    assert!(matches!(decision, Decision::Warn { .. }));
    assert_eq!(decision.rule_id(), Some("exfil-domain"));

    let output: Value =
        serde_json::from_str(&HookOutput::from_decision(&decision, input.event_name()).to_json())
            .unwrap();
    assert!(output.get("hookSpecificOutput").is_none());
    assert!(output["systemMessage"]
        .as_str()
        .unwrap()
        .starts_with("[code-guardian] Warning: Exfiltration guard:"));
}

#[test]
fn test_warn_only_env_converts_deny_to_warn() {
    let _guard = lock_env();
    let engine = GuardEngine::load(reference_config());

    env::set_var(WARN_ONLY_ENV, "1");
    let decision = engine.check(&write_dict("m.py"));
    env::remove_var(WARN_ONLY_ENV);

    assert!(matches!(decision, Decision::Warn { .. }));
    assert!(engine.check(&write_dict("m.py")).is_deny());
}

#[test]
fn test_warn_only_leaves_allows_alone() {
    let _guard = lock_env();
    let mut config = reference_config();
    config.general.warn_only = true;
    let engine = GuardEngine::load(config);
    assert!(engine.check(&write_dict("m.ts")).is_allow());
}

// ============================================================================
// Allowlist
// ============================================================================

#[test]
fn test_allowlist_file_scoped_by_surface() {
    let _guard = lock_env();
    let dir = TempDir::new().unwrap();
    let allow_path = dir.path().join("allow.toml");
    fs::write(
        &allow_path,
        r#"
[[allow]]
pattern = "^https://webhook\\.site/x$"
reason = "Team webhook used in CI docs"
surface = "fetch"

[[allow]]
pattern = "(^|/)legacy/"
reason = "Pydantic v1 compatibility layer"
surface = "write"
"#,
    )
    .unwrap();

    let mut config = reference_config();
    config.rules.allowlist = Some(allow_path.display().to_string());
    let engine = GuardEngine::load(config);

    let decision = engine.check(&fetch_evil());
    assert!(decision.is_allow());
    assert!(decision.reason().contains("Team webhook"));

    assert!(engine.check(&write_dict("src/legacy/models.py")).is_allow());
    assert!(engine.check(&write_dict("src/models.py")).is_deny());

    // fetch entry does not cover the same URL from Bash
    let bash = HookInput::from_json(
        r#"{"tool_name":"Bash","tool_input":{"command":"curl https://webhook.site/x"}}"#,
    )
    .unwrap();
    assert!(engine.check(&bash).is_deny());
}

#[test]
fn test_broken_allowlist_is_ignored() {
    let _guard = lock_env();
    let dir = TempDir::new().unwrap();
    let allow_path = dir.path().join("allow.toml");
    fs::write(&allow_path, "[[allow]]\npattern = \"(\"\nreason = \"broken\"\n").unwrap();

    let mut config = reference_config();
    config.rules.allowlist = Some(allow_path.display().to_string());
    let engine = GuardEngine::load(config);

    assert!(engine.check(&fetch_evil()).is_deny());
}

// ============================================================================
// Rule source location
// ============================================================================

fn plugin_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("reference")).unwrap();
    fs::write(
        dir.path().join("reference/exfil-patterns.json"),
        r#"{"suspicious_domains":["plugin-root.test"]}"#,
    )
    .unwrap();
    dir
}

fn relative_config() -> Config {
    let mut config = Config::default();
    config.rules.allowlist = None;
    config
}

#[test]
fn test_plugin_root_from_config() {
    let _guard = lock_env();
    env::remove_var(PLUGIN_ROOT_ENV);
    let dir = plugin_dir();

    let mut config = relative_config();
    config.rules.plugin_root = Some(dir.path().display().to_string());
    let engine = GuardEngine::load(config);

    assert_eq!(engine.exfil_config().suspicious_domains, vec!["plugin-root.test"]);
}

#[test]
fn test_plugin_root_env_wins() {
    let _guard = lock_env();
    let dir = plugin_dir();

    let mut config = relative_config();
    config.rules.plugin_root = Some("/nonexistent/code-guardian".to_string());

    env::set_var(PLUGIN_ROOT_ENV, dir.path());
    let engine = GuardEngine::load(config);
    env::remove_var(PLUGIN_ROOT_ENV);

    assert_eq!(engine.exfil_config().suspicious_domains, vec!["plugin-root.test"]);
    // content rules are absent from this root
    assert!(engine.content_rules().is_empty());
    assert!(engine.check(&write_dict("m.py")).is_allow());
}

// ============================================================================
// Config loading
// ============================================================================

#[test]
fn test_default_config() {
    let _guard = lock_env();
    let config = Config::default();
    assert!(!config.general.warn_only);
    assert_eq!(config.general.min_severity, Severity::Low);
    assert_eq!(config.rules.content_rules, "reference/anti-patterns.json");
    assert_eq!(config.limits.max_input_bytes, 1_000_000);
}

#[test]
fn test_config_file_roundtrip() {
    let _guard = lock_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[general]
warn_only = true
min_severity = "high"

[limits]
max_input_bytes = 4096
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(config.general.warn_only);
    assert_eq!(config.general.min_severity, Severity::High);
    assert_eq!(config.limits.max_input_bytes, 4096);
    // untouched sections keep their defaults
    assert_eq!(config.rules.exfil_patterns, "reference/exfil-patterns.json");
}

#[test]
fn test_malformed_config_is_an_error() {
    let _guard = lock_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[general]\nmin_severity = \"extreme\"\n").unwrap();
    assert!(Config::load_from(&path).is_err());
    assert!(Config::load_from(&dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_config_expand_path() {
    let _guard = lock_env();
    let expanded = Config::expand_path("~/.claude/code-guardian/config.toml");
    assert!(!expanded.to_string_lossy().starts_with('~'));
}
