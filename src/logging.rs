//! Tracing initialization.
//!
//! Diagnostics go to stderr through a compact `tracing-subscriber` formatter so
//! they never mix with the report printed on stdout. `RUST_LOG` takes precedence
//! over the level picked on the command line.
use crate::config::LogLevel;
use tracing_subscriber::EnvFilter;

fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()))
}

/// Installs the global subscriber. Calling it again is a no-op.
pub fn init_logging(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
