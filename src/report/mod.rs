// src/report/mod.rs

//! Turning terminal results into test-framework signals.

pub mod handle;
pub mod reporter;

pub use handle::{RustTest, TestHandle};
pub use reporter::{fail_on_error, into_result, log_terminal, record_on_error};
