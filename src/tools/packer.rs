// src/tools/packer.rs

//! `packer build`.
//!
//! Packer builds talk to remote builders over SSH and pull packages from
//! public mirrors, so a handful of failures are known to go away on their
//! own. Those are retried by default.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::command::{Operation, SharedSink};
use crate::errors::Result;
use crate::exec::{ExecutionOutcome, ProcessExecutor, RealProcessExecutor};
use crate::namespace::generate_namespace;
use crate::report::{TestHandle, fail_on_error, into_result};
use crate::retry::{RetryPolicy, execute_with_retry};
use crate::tool::InvocationForm;
use crate::types::OutputMode;

pub const DEFAULT_MAX_PACKER_ATTEMPTS: u32 = 3;
pub const DEFAULT_TIME_BETWEEN_PACKER_RETRIES: Duration = Duration::from_secs(15);

/// Output fragments of packer failures that are worth another attempt.
pub fn default_retryable_packer_errors() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "Script disconnected unexpectedly".to_string(),
            "Packer occasionally loses its SSH connection to the builder".to_string(),
        ),
        (
            "can not open /var/lib/apt/lists/".to_string(),
            "apt-get occasionally fails to update its cache on Ubuntu builders".to_string(),
        ),
        (
            "Temporary failure resolving".to_string(),
            "DNS hiccup on the builder while reaching a package mirror".to_string(),
        ),
    ])
}

/// The policy used when [`PackerOptions::retry`] is not set.
pub fn default_packer_policy() -> RetryPolicy {
    RetryPolicy::new_unchecked(
        DEFAULT_MAX_PACKER_ATTEMPTS,
        DEFAULT_TIME_BETWEEN_PACKER_RETRIES,
        default_retryable_packer_errors(),
    )
}

#[derive(Debug, Clone, Default)]
pub struct PackerOptions {
    /// Template file or directory passed as the last argument.
    pub template: String,
    /// `-var key=value` pairs.
    pub vars: BTreeMap<String, String>,
    /// `-only=<builders>`.
    pub only: Option<String>,
    pub env: BTreeMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub sink: Option<SharedSink>,
    pub retry: Option<RetryPolicy>,
    pub timeout: Option<Duration>,
}

pub struct Packer<E = RealProcessExecutor> {
    executor: E,
}

impl Packer<RealProcessExecutor> {
    pub fn new() -> Self {
        Self::with_executor(RealProcessExecutor)
    }
}

impl Default for Packer<RealProcessExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ProcessExecutor> Packer<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Build the template, failing the test on error.
    pub async fn build<T>(&self, test: &T, options: &PackerOptions) -> String
    where
        T: TestHandle + ?Sized,
    {
        let result = self.execute(test, options).await;
        fail_on_error(test, result, OutputMode::Combined)
    }

    pub async fn build_e<T>(&self, test: &T, options: &PackerOptions) -> Result<String>
    where
        T: TestHandle + ?Sized,
    {
        let result = self.execute(test, options).await;
        into_result(&test.name(), result, OutputMode::Combined)
    }

    async fn execute<T>(&self, test: &T, options: &PackerOptions) -> Result<ExecutionOutcome>
    where
        T: TestHandle + ?Sized,
    {
        let namespace = generate_namespace(&test.name());
        let spec = packer_operation(options).to_spec(
            &InvocationForm::standalone("packer"),
            &namespace,
            options.sink.clone(),
        );
        let policy = options.retry.clone().unwrap_or_else(default_packer_policy);

        execute_with_retry(&self.executor, &spec, &policy, OutputMode::Combined).await
    }
}

pub fn packer_operation(options: &PackerOptions) -> Operation {
    let mut trailing = Vec::new();
    for (key, value) in &options.vars {
        trailing.push("-var".to_string());
        trailing.push(format!("{}={}", key, value));
    }
    if let Some(only) = &options.only {
        trailing.push(format!("-only={}", only));
    }
    trailing.push(options.template.clone());

    Operation::new(["build"])
        .trailing_args(trailing)
        .env(options.env.clone())
        .mandate_env("CHECKPOINT_DISABLE", "1")
        .working_dir(options.working_dir.clone())
        .timeout(options.timeout)
}
