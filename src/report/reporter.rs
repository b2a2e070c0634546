// src/report/reporter.rs

//! Surfacing a terminal result to the caller.
//!
//! All three modes take the same `execute_with_retry` result; they only
//! differ in what happens to an error:
//!
//! | mode                 | on success    | on error                                  |
//! |----------------------|---------------|-------------------------------------------|
//! | [`fail_on_error`]    | output        | `fail_now`, test stops                    |
//! | [`record_on_error`]  | output        | `record_failure`, last output returned    |
//! | [`into_result`]      | `Ok(output)`  | `Err(error)` for the caller to handle     |

use tracing::{error, info};

use crate::errors::{Result, ToolrunError};
use crate::exec::ExecutionOutcome;
use crate::types::OutputMode;

use super::handle::TestHandle;

/// Return the output, or fail the test immediately.
pub fn fail_on_error<T>(test: &T, result: Result<ExecutionOutcome>, mode: OutputMode) -> String
where
    T: TestHandle + ?Sized,
{
    log_terminal(&test.name(), &result);
    match result {
        Ok(outcome) => outcome.output(mode).to_string(),
        Err(err) => test.fail_now(&err.to_string()),
    }
}

/// Return the output; on error, record a failure on the test and return
/// whatever output the failed attempt produced.
pub fn record_on_error<T>(test: &T, result: Result<ExecutionOutcome>, mode: OutputMode) -> String
where
    T: TestHandle + ?Sized,
{
    log_terminal(&test.name(), &result);
    match result {
        Ok(outcome) => outcome.output(mode).to_string(),
        Err(err) => {
            test.record_failure(&err.to_string());
            err.outcome()
                .map(|o| o.output(mode).to_string())
                .unwrap_or_default()
        }
    }
}

/// Hand the result back untouched, apart from selecting the output text.
pub fn into_result(
    test_name: &str,
    result: Result<ExecutionOutcome>,
    mode: OutputMode,
) -> Result<String> {
    log_terminal(test_name, &result);
    result.map(|outcome| outcome.output(mode).to_string())
}

/// Emit one structured record describing how an operation ended.
pub fn log_terminal(test_name: &str, result: &Result<ExecutionOutcome>) {
    match result {
        Ok(outcome) => info!(
            test = %test_name,
            exit_code = outcome.exit_code,
            "operation succeeded"
        ),
        Err(ToolrunError::NonRetryableFailure {
            command,
            exit_code,
            ..
        }) => error!(
            test = %test_name,
            %command,
            exit_code,
            classification = "non_retryable",
            "operation failed"
        ),
        Err(ToolrunError::ExhaustedRetries {
            command,
            attempts,
            signature,
            ..
        }) => error!(
            test = %test_name,
            %command,
            attempts,
            %signature,
            classification = "exhausted_retries",
            "operation failed"
        ),
        Err(other) => error!(test = %test_name, error = %other, "operation could not run"),
    }
}
