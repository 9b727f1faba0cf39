//! Diagnostic logging
//!
//! Stdout carries the hook response, so every log line goes to stderr.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "CODE_GUARDIAN_LOG";

/// Install the global subscriber. Failure is ignored; a hook must not stop
/// working because logging could not be set up.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_target(true),
            )
            .with(filter)
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("code-guardian: logging disabled: {}", e);
    }
}
