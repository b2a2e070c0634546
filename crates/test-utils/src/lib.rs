pub mod builders;
pub mod fake_executor;

use std::sync::{Mutex, Once};
use tracing_subscriber::fmt;

use toolrun::logging::{LOG_ENV_VAR, filter_from_env};
use toolrun::report::TestHandle;

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Uses the same `TOOLRUN_LOG` directives as the binary, e.g.
/// `TOOLRUN_LOG=debug,toolrun::output=trace cargo test -- --nocapture`.
/// Captured logs are only shown for failing tests.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = filter_from_env(std::env::var(LOG_ENV_VAR).ok().as_deref());

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// A `TestHandle` that remembers recorded failures instead of panicking on
/// drop. `fail_now` still panics, so use `#[should_panic]` to observe it.
pub struct RecordingTest {
    name: String,
    failures: Mutex<Vec<String>>,
}

impl RecordingTest {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            failures: Mutex::new(Vec::new()),
        }
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

impl TestHandle for RecordingTest {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn fail_now(&self, message: &str) -> ! {
        panic!("fail_now: {}", message);
    }

    fn record_failure(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }
}
