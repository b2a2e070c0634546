// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running commands, using
//! `tokio::process::Command`, and turning what happened into an
//! [`ExecutionOutcome`].
//!
//! - [`process`] spawns the child, streams its output to the log sink and
//!   captures it.
//! - [`outcome`] holds the per-attempt evidence.
//! - [`backend`] provides the `ProcessExecutor` trait and the
//!   `RealProcessExecutor` used in production, which tests replace with a
//!   scripted implementation.

pub mod backend;
pub mod outcome;
pub mod process;

pub use backend::{ProcessExecutor, RealProcessExecutor};
pub use outcome::ExecutionOutcome;
pub use process::{execute, execute_capturing_stdout_only, run_process};
