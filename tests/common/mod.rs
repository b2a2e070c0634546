use std::sync::Arc;

use toolrun::command::{CommandSpec, CommandSpecBuilder, MemorySink};

pub use toolrun_test_utils::{init_tracing, with_timeout};

/// `sh -c <script>` writing its output into `sink`.
#[allow(dead_code)]
pub fn sh(script: &str, sink: &Arc<MemorySink>) -> CommandSpecBuilder {
    CommandSpec::builder("sh")
        .arg("-c")
        .arg(script)
        .sink(sink.clone())
        .tag("process-test")
}
