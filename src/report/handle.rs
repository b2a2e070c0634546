// src/report/handle.rs

use std::sync::Mutex;

use tracing::error;

/// The slice of a test framework the harness needs.
pub trait TestHandle {
    /// Name of the running test. Default input for namespace generation.
    fn name(&self) -> String;

    /// Fail the test and stop it right here.
    fn fail_now(&self, message: &str) -> !;

    /// Mark the test as failed but let it keep running.
    fn record_failure(&self, message: &str);
}

/// [`TestHandle`] for the built-in `#[test]` / `#[tokio::test]` harness.
///
/// - The name is taken from the current thread, which libtest names after
///   the test path (`module::test_name`).
/// - `fail_now` panics.
/// - Recorded failures are collected and turned into a single panic when the
///   handle is dropped, so a test can report several problems at once.
#[derive(Debug)]
pub struct RustTest {
    name: String,
    failures: Mutex<Vec<String>>,
}

impl RustTest {
    /// Handle named after the current test thread.
    pub fn current() -> Self {
        let name = std::thread::current()
            .name()
            .filter(|n| *n != "main")
            .unwrap_or("toolrun")
            .to_string();
        Self::named(name)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Failures recorded so far.
    pub fn failures(&self) -> Vec<String> {
        match self.failures.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl TestHandle for RustTest {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn fail_now(&self, message: &str) -> ! {
        panic!("{}: {}", self.name, message);
    }

    fn record_failure(&self, message: &str) {
        error!(test = %self.name, "{}", message);
        match self.failures.lock() {
            Ok(mut guard) => guard.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}

impl Drop for RustTest {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let failures = self.failures();
        if !failures.is_empty() {
            panic!(
                "{}: {} recorded failure(s):\n{}",
                self.name,
                failures.len(),
                failures.join("\n---\n")
            );
        }
    }
}
