// src/exec/outcome.rs

use crate::types::OutputMode;

/// Evidence from one finished process attempt.
///
/// Created once per attempt and never modified afterwards. A non-zero
/// `exit_code` is plain data here; deciding whether it is a failure worth
/// retrying is the retry controller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Process exit code, or `-1` if the process was killed by a signal or
    /// timed out.
    pub exit_code: i32,
    /// Stdout and stderr lines interleaved in arrival order, joined by `\n`.
    pub combined_output: String,
    /// Stdout alone. Only captured in [`OutputMode::StdoutOnly`].
    pub stdout: Option<String>,
    /// Stderr alone. Only captured in [`OutputMode::StdoutOnly`].
    pub stderr: Option<String>,
    pub timed_out: bool,
}

impl ExecutionOutcome {
    /// Outcome of a process that exited normally, with combined capture only.
    pub fn exited(exit_code: i32, combined_output: impl Into<String>) -> Self {
        Self {
            exit_code,
            combined_output: combined_output.into(),
            stdout: None,
            stderr: None,
            timed_out: false,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }

    /// The text a caller asked for: stdout alone when it was captured
    /// separately and `mode` wants it, the combined output otherwise.
    pub fn output(&self, mode: OutputMode) -> &str {
        match (mode, &self.stdout) {
            (OutputMode::StdoutOnly, Some(stdout)) => stdout,
            _ => &self.combined_output,
        }
    }
}
