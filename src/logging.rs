// src/logging.rs

//! Logging setup for `toolrun` using `tracing` + `tracing-subscriber`.
//!
//! The filter is picked in this order:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `TOOLRUN_LOG`, with `EnvFilter` directive syntax, so the streamed child
//!    output can be tuned on its own: `TOOLRUN_LOG=info,toolrun::output=warn`
//! 3. `info`
//!
//! Logs go to STDERR; stdout carries only the captured command output.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding the filter directives.
pub const LOG_ENV_VAR: &str = "TOOLRUN_LOG";

/// Target of the events [`crate::command::TracingSink`] emits per output line.
pub const OUTPUT_TARGET: &str = "toolrun::output";

/// Initialise the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(lvl) => EnvFilter::new(directive_for(lvl)),
        None => filter_from_env(std::env::var(LOG_ENV_VAR).ok().as_deref()),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}

/// Filter for a `TOOLRUN_LOG` value. Unset, blank or unparsable values fall
/// back to `info`.
pub fn filter_from_env(value: Option<&str>) -> EnvFilter {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn directive_for(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
