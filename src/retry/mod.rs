// src/retry/mod.rs

//! Bounded retries for flaky external tools.
//!
//! What counts as "transient" is tool specific, so the caller supplies the
//! table of retryable output signatures in a [`RetryPolicy`].

pub mod controller;
pub mod policy;

pub use controller::{Verdict, classify, execute_with_retry};
pub use policy::RetryPolicy;
