// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Only [`ToolrunError::NonRetryableFailure`] and
//! [`ToolrunError::ExhaustedRetries`] describe a command that actually ran and
//! failed. Transient failures and inconclusive tool probes are absorbed by the
//! retry controller and the resolver and never surface here.

use thiserror::Error;

use crate::exec::ExecutionOutcome;

#[derive(Error, Debug)]
pub enum ToolrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("failed to spawn '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no candidate invocation forms were given to the tool resolver")]
    NoCandidateForms,

    /// Non-zero exit whose output matched none of the retryable signatures.
    #[error(
        "'{command}' exited with code {exit_code} (not retryable){}\n{}",
        timed_out_suffix(.outcome),
        .outcome.combined_output
    )]
    NonRetryableFailure {
        command: String,
        exit_code: i32,
        outcome: ExecutionOutcome,
    },

    /// A retryable signature kept recurring until the attempt budget ran out.
    #[error(
        "'{command}' still failing after {attempts} attempt(s); last exit code {}: \
         matched '{signature}' ({explanation})\n{}",
        .outcome.exit_code,
        .outcome.combined_output
    )]
    ExhaustedRetries {
        command: String,
        attempts: u32,
        signature: String,
        explanation: String,
        outcome: ExecutionOutcome,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToolrunError {
    /// The last captured outcome, for errors that carry one.
    pub fn outcome(&self) -> Option<&ExecutionOutcome> {
        match self {
            ToolrunError::NonRetryableFailure { outcome, .. }
            | ToolrunError::ExhaustedRetries { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

fn timed_out_suffix(outcome: &ExecutionOutcome) -> &'static str {
    if outcome.timed_out { " after timing out" } else { "" }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ToolrunError>;
