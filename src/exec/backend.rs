// src/exec/backend.rs

//! Pluggable process executor abstraction.
//!
//! The retry controller and the tool resolver talk to a `ProcessExecutor`
//! instead of spawning processes themselves, so tests can swap in a scripted
//! executor while production uses [`RealProcessExecutor`].

use std::future::Future;
use std::pin::Pin;

use crate::command::CommandSpec;
use crate::errors::Result;
use crate::types::OutputMode;

use super::outcome::ExecutionOutcome;
use super::process::run_process;

/// Trait abstracting how a single command attempt is run.
pub trait ProcessExecutor: Send + Sync {
    /// Run `spec` once and report what happened.
    ///
    /// Implementations must return `Ok` for any process that actually ran,
    /// whatever its exit code. `Err` is reserved for not being able to run
    /// it at all (e.g. the binary is missing).
    fn execute<'a>(
        &'a self,
        spec: &'a CommandSpec,
        mode: OutputMode,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionOutcome>> + Send + 'a>>;
}

/// Real executor backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealProcessExecutor;

impl RealProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessExecutor for RealProcessExecutor {
    fn execute<'a>(
        &'a self,
        spec: &'a CommandSpec,
        mode: OutputMode,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionOutcome>> + Send + 'a>> {
        Box::pin(run_process(spec, mode))
    }
}

impl<E: ProcessExecutor + ?Sized> ProcessExecutor for &E {
    fn execute<'a>(
        &'a self,
        spec: &'a CommandSpec,
        mode: OutputMode,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionOutcome>> + Send + 'a>> {
        (**self).execute(spec, mode)
    }
}
