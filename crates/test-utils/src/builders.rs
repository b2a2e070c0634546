#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::Duration;

use toolrun::exec::ExecutionOutcome;
use toolrun::retry::RetryPolicy;

/// Builder for `RetryPolicy` to simplify test setup.
pub struct RetryPolicyBuilder {
    max_attempts: u32,
    delay: Duration,
    signatures: BTreeMap<String, String>,
}

impl RetryPolicyBuilder {
    pub fn new() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
            signatures: BTreeMap::new(),
        }
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn signature(mut self, needle: &str, explanation: &str) -> Self {
        self.signatures
            .insert(needle.to_string(), explanation.to_string());
        self
    }

    pub fn build(self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.delay, self.signatures)
            .expect("Failed to build valid retry policy from builder")
    }
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Successful attempt with the given combined output.
pub fn succeeded(output: &str) -> ExecutionOutcome {
    ExecutionOutcome::exited(0, output)
}

/// Failed attempt with the given exit code and combined output.
pub fn failed(exit_code: i32, output: &str) -> ExecutionOutcome {
    ExecutionOutcome::exited(exit_code, output)
}

/// Successful attempt with stdout and stderr captured separately.
pub fn succeeded_split(stdout: &str, stderr: &str) -> ExecutionOutcome {
    let combined = match (stdout.is_empty(), stderr.is_empty()) {
        (true, _) => stderr.to_string(),
        (_, true) => stdout.to_string(),
        _ => format!("{}\n{}", stdout, stderr),
    };
    ExecutionOutcome {
        exit_code: 0,
        combined_output: combined,
        stdout: Some(stdout.to_string()),
        stderr: Some(stderr.to_string()),
        timed_out: false,
    }
}
