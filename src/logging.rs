// src/logging.rs

//! Diagnostics for `procout` itself, written to STDERR next to relayed
//! stderr lines.
//!
//! The filter is picked from, in order:
//! 1. `--log-level`, applied to `procout` targets only
//! 2. `PROCOUT_LOG`: either a bare level (same meaning as the flag) or full
//!    `EnvFilter` directives such as `procout::exec=trace`
//! 3. `warn`
//!
//! Bare levels never raise other crates above `warn`, so `--log-level trace`
//! shows relay and supervisor activity without runtime noise.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "PROCOUT_LOG";

const BASE_DIRECTIVE: &str = "warn";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return EnvFilter::new(crate_directive(level_from_log_level(lvl)));
    }

    let Some(raw) = env.map(str::trim).filter(|s| !s.is_empty()) else {
        return EnvFilter::new(BASE_DIRECTIVE);
    };

    if let Some(level) = parse_level_str(raw) {
        return EnvFilter::new(crate_directive(level));
    }

    EnvFilter::try_new(raw).unwrap_or_else(|e| {
        // Runs before any subscriber is installed.
        eprintln!("procout: ignoring invalid {LOG_ENV}='{raw}': {e}");
        EnvFilter::new(BASE_DIRECTIVE)
    })
}

fn crate_directive(level: tracing::Level) -> String {
    format!(
        "{BASE_DIRECTIVE},{}={}",
        env!("CARGO_CRATE_NAME"),
        level.as_str().to_ascii_lowercase()
    )
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
