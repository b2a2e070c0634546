// src/tools/compose.rs

//! Docker Compose.
//!
//! Compose is installed either as the `docker compose` plugin or as the
//! legacy `docker-compose` binary. The plugin is preferred; which one is used
//! is decided once per [`Compose`] value.
//!
//! Every invocation gets `--project-name <namespace>` so that containers,
//! networks and volumes of tests running in parallel never collide.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::command::{Operation, SharedSink};
use crate::errors::Result;
use crate::exec::{ExecutionOutcome, ProcessExecutor, RealProcessExecutor};
use crate::namespace::generate_namespace;
use crate::report::{TestHandle, fail_on_error, into_result, record_on_error};
use crate::retry::{RetryPolicy, execute_with_retry};
use crate::tool::{CommandProbe, InvocationForm, ToolResolver};
use crate::types::OutputMode;

/// Options for a compose invocation.
#[derive(Debug, Clone, Default)]
pub struct ComposeOptions {
    pub working_dir: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
    /// Build images with BuildKit (`DOCKER_BUILDKIT=1`,
    /// `COMPOSE_DOCKER_CLI_BUILD=1`) unless `env` says otherwise.
    pub enable_buildkit: bool,
    /// Compose project name. Defaults to the test name. Sanitized either way.
    pub project_name: Option<String>,
    pub sink: Option<SharedSink>,
    /// Defaults to a single attempt.
    pub retry: Option<RetryPolicy>,
    pub timeout: Option<Duration>,
}

/// Preferred first: the integrated plugin, then the standalone binary.
pub fn compose_candidates() -> Vec<InvocationForm> {
    vec![
        InvocationForm::integrated("docker", "compose"),
        InvocationForm::standalone("docker-compose"),
    ]
}

/// Compose runner. Holds the resolved invocation form for its lifetime.
pub struct Compose<E = RealProcessExecutor> {
    executor: E,
    resolver: ToolResolver,
}

impl Compose<RealProcessExecutor> {
    pub fn new() -> Self {
        Self::with_executor(RealProcessExecutor)
    }
}

impl Default for Compose<RealProcessExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ProcessExecutor> Compose<E> {
    pub fn with_executor(executor: E) -> Self {
        Self {
            executor,
            resolver: ToolResolver::new(compose_candidates()),
        }
    }

    pub fn resolver(&self) -> &ToolResolver {
        &self.resolver
    }

    /// Run compose and return stdout+stderr. Fails the test on error.
    pub async fn run<T>(&self, test: &T, options: &ComposeOptions, args: &[&str]) -> String
    where
        T: TestHandle + ?Sized,
    {
        let result = self.execute(test, options, OutputMode::Combined, args).await;
        fail_on_error(test, result, OutputMode::Combined)
    }

    /// Run compose and return only stdout. Fails the test on error.
    pub async fn run_stdout<T>(&self, test: &T, options: &ComposeOptions, args: &[&str]) -> String
    where
        T: TestHandle + ?Sized,
    {
        let result = self.execute(test, options, OutputMode::StdoutOnly, args).await;
        fail_on_error(test, result, OutputMode::StdoutOnly)
    }

    /// Run compose; on error mark the test failed but keep going, returning
    /// whatever output was captured.
    pub async fn run_or_record<T>(
        &self,
        test: &T,
        options: &ComposeOptions,
        args: &[&str],
    ) -> String
    where
        T: TestHandle + ?Sized,
    {
        let result = self.execute(test, options, OutputMode::Combined, args).await;
        record_on_error(test, result, OutputMode::Combined)
    }

    /// Run compose and hand any error back to the caller.
    pub async fn run_e<T>(
        &self,
        test: &T,
        options: &ComposeOptions,
        args: &[&str],
    ) -> Result<String>
    where
        T: TestHandle + ?Sized,
    {
        let result = self.execute(test, options, OutputMode::Combined, args).await;
        into_result(&test.name(), result, OutputMode::Combined)
    }

    async fn execute<T>(
        &self,
        test: &T,
        options: &ComposeOptions,
        mode: OutputMode,
        args: &[&str],
    ) -> Result<ExecutionOutcome>
    where
        T: TestHandle + ?Sized,
    {
        let probe = CommandProbe::new(&self.executor);
        let form = self.resolver.resolve(&probe).await?;

        let project_name = options
            .project_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| test.name());
        let namespace = generate_namespace(&project_name);

        let spec = compose_operation(options, args).to_spec(form, &namespace, options.sink.clone());
        let policy = options
            .retry
            .clone()
            .unwrap_or_else(RetryPolicy::single_attempt);

        execute_with_retry(&self.executor, &spec, &policy, mode).await
    }
}

/// The form-independent part of a compose invocation.
pub fn compose_operation(options: &ComposeOptions, args: &[&str]) -> Operation {
    let mut op = Operation::new(Vec::<String>::new())
        .namespace_flag("--project-name")
        .trailing_args(args.iter().copied())
        .env(options.env.clone())
        .working_dir(options.working_dir.clone())
        .timeout(options.timeout);

    if options.enable_buildkit {
        op = op
            .mandate_env("DOCKER_BUILDKIT", "1")
            .mandate_env("COMPOSE_DOCKER_CLI_BUILD", "1");
    }

    op
}
