// src/retry/policy.rs

use std::collections::BTreeMap;
use std::time::Duration;

use crate::errors::{Result, ToolrunError};

/// How hard to try a logical operation before giving up.
///
/// - `max_attempts` bounds the total number of process runs, the first one
///   included. Always at least 1.
/// - `delay` is slept between attempts. It is fixed: no exponential growth,
///   no jitter.
/// - `signatures` maps a literal substring of the combined output to a
///   human-readable explanation. Only failures whose output contains one of
///   the keys are retried; the explanation is purely diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
    signatures: BTreeMap<String, String>,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        delay: Duration,
        signatures: BTreeMap<String, String>,
    ) -> Result<Self> {
        if max_attempts == 0 {
            return Err(ToolrunError::ConfigError(
                "retry max_attempts must be >= 1 (got 0)".to_string(),
            ));
        }
        if signatures.keys().any(|k| k.is_empty()) {
            return Err(ToolrunError::ConfigError(
                "retryable signatures must not be empty strings".to_string(),
            ));
        }
        Ok(Self {
            max_attempts,
            delay,
            signatures,
        })
    }

    /// For built-in tables that are valid by construction.
    pub(crate) fn new_unchecked(
        max_attempts: u32,
        delay: Duration,
        signatures: BTreeMap<String, String>,
    ) -> Self {
        debug_assert!(max_attempts >= 1);
        Self {
            max_attempts,
            delay,
            signatures,
        }
    }

    /// Run exactly once; every failure is final.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
            signatures: BTreeMap::new(),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn signatures(&self) -> &BTreeMap<String, String> {
        &self.signatures
    }

    /// First signature (in key order) contained in `output`, with its
    /// explanation.
    pub fn match_signature(&self, output: &str) -> Option<(&str, &str)> {
        self.signatures
            .iter()
            .find(|(needle, _)| output.contains(needle.as_str()))
            .map(|(needle, why)| (needle.as_str(), why.as_str()))
    }
}
