// src/retry/controller.rs

//! The retry loop around the process executor.
//!
//! ```text
//! Attempting -> Evaluating -> Succeeded                      (exit 0)
//!                          -> Escalated                      (no signature matched)
//!                          -> Backoff -> Attempting          (matched, budget left)
//!                          -> Exhausted                      (matched, budget spent)
//! ```
//!
//! Every attempt runs the very same `CommandSpec`. Failing to spawn the
//! process at all is not an attempt outcome and is returned immediately.

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::command::CommandSpec;
use crate::errors::{Result, ToolrunError};
use crate::exec::{ExecutionOutcome, ProcessExecutor};
use crate::types::OutputMode;

use super::policy::RetryPolicy;

/// Classification of a single attempt against a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Succeeded,
    /// Failed with a known transient signature in the output.
    Transient {
        signature: String,
        explanation: String,
    },
    /// Failed, and nothing suggests retrying would help.
    Fatal,
}

/// Decide what an outcome means under `policy`.
pub fn classify(outcome: &ExecutionOutcome, policy: &RetryPolicy) -> Verdict {
    if outcome.success() {
        return Verdict::Succeeded;
    }
    match policy.match_signature(&outcome.combined_output) {
        Some((signature, explanation)) => Verdict::Transient {
            signature: signature.to_string(),
            explanation: explanation.to_string(),
        },
        None => Verdict::Fatal,
    }
}

/// Run `spec` until it succeeds, fails fatally, or the attempt budget is
/// used up.
///
/// The executor is invoked at most `policy.max_attempts()` times and
/// `policy.delay()` is slept between consecutive attempts only.
pub async fn execute_with_retry<E>(
    executor: &E,
    spec: &CommandSpec,
    policy: &RetryPolicy,
    mode: OutputMode,
) -> Result<ExecutionOutcome>
where
    E: ProcessExecutor + ?Sized,
{
    let max_attempts = policy.max_attempts();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        debug!(command = %spec, attempt, max_attempts, "running attempt");

        let outcome = executor.execute(spec, mode).await?;

        match classify(&outcome, policy) {
            Verdict::Succeeded => {
                if attempt > 1 {
                    info!(command = %spec, attempt, "command succeeded after retrying");
                }
                return Ok(outcome);
            }
            Verdict::Fatal => {
                warn!(
                    command = %spec,
                    attempt,
                    exit_code = outcome.exit_code,
                    "command failed with a non-retryable error"
                );
                return Err(ToolrunError::NonRetryableFailure {
                    command: spec.to_string(),
                    exit_code: outcome.exit_code,
                    outcome,
                });
            }
            Verdict::Transient {
                signature,
                explanation,
            } => {
                if attempt >= max_attempts {
                    error!(
                        command = %spec,
                        attempts = attempt,
                        %signature,
                        "retryable error persisted; giving up"
                    );
                    return Err(ToolrunError::ExhaustedRetries {
                        command: spec.to_string(),
                        attempts: attempt,
                        signature,
                        explanation,
                        outcome,
                    });
                }

                warn!(
                    command = %spec,
                    attempt,
                    max_attempts,
                    %signature,
                    %explanation,
                    delay = ?policy.delay(),
                    "transient failure; retrying"
                );
                sleep(policy.delay()).await;
            }
        }
    }
}
