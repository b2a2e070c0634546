// src/tools/docker.rs

use tracing::info;

use crate::command::{CommandSpec, SharedSink, default_sink};
use crate::errors::Result;
use crate::exec::{ProcessExecutor, RealProcessExecutor};
use crate::namespace::generate_namespace;
use crate::report::{TestHandle, into_result};
use crate::retry::{RetryPolicy, execute_with_retry};
use crate::types::OutputMode;

/// Plain `docker` CLI operations.
pub struct Docker<E = RealProcessExecutor> {
    executor: E,
}

impl Docker<RealProcessExecutor> {
    pub fn new() -> Self {
        Self::with_executor(RealProcessExecutor)
    }
}

impl Default for Docker<RealProcessExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ProcessExecutor> Docker<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// `docker push <tag>`, failing the test on error.
    pub async fn push<T>(&self, test: &T, sink: Option<SharedSink>, tag: &str)
    where
        T: TestHandle + ?Sized,
    {
        if let Err(err) = self.push_e(test, sink, tag).await {
            test.fail_now(&err.to_string());
        }
    }

    /// `docker push <tag>`.
    pub async fn push_e<T>(&self, test: &T, sink: Option<SharedSink>, tag: &str) -> Result<()>
    where
        T: TestHandle + ?Sized,
    {
        let name = test.name();
        info!(test = %name, %tag, "running 'docker push'");

        let spec = CommandSpec::builder("docker")
            .args(["push", tag])
            .sink(sink.unwrap_or_else(default_sink))
            .tag(generate_namespace(&name).as_str())
            .build();

        let result = execute_with_retry(
            &self.executor,
            &spec,
            &RetryPolicy::single_attempt(),
            OutputMode::Combined,
        )
        .await;

        into_result(&name, result, OutputMode::Combined).map(|_| ())
    }
}
