// tests/process_executor.rs
//
// These tests spawn real `sh` processes.

mod common;
use crate::common::{init_tracing, sh, with_timeout};

use std::sync::Arc;
use std::time::{Duration, Instant};

use toolrun::command::{CommandSpec, MemorySink};
use toolrun::errors::ToolrunError;
use toolrun::exec::{
    ProcessExecutor, RealProcessExecutor, execute, execute_capturing_stdout_only, run_process,
};
use toolrun::namespace::generate_namespace;
use toolrun::retry::{RetryPolicy, execute_with_retry};
use toolrun::types::{OutputMode, StreamKind};

#[tokio::test]
async fn successful_command_reports_exit_zero_and_output() {
    init_tracing();
    let sink = Arc::new(MemorySink::new());

    let outcome = with_timeout(execute(&sh("echo one; echo two", &sink).build()))
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 0);
    assert!(outcome.success());
    assert!(!outcome.timed_out);
    assert_eq!(outcome.combined_output, "one\ntwo");
}

#[tokio::test]
async fn non_zero_exit_is_data_not_an_error() {
    let sink = Arc::new(MemorySink::new());

    let outcome = with_timeout(execute(&sh("echo broken >&2; exit 3", &sink).build()))
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 3);
    assert!(!outcome.success());
    assert_eq!(outcome.combined_output, "broken");
}

#[tokio::test]
async fn combined_mode_captures_both_streams_only_together() {
    let sink = Arc::new(MemorySink::new());

    let outcome = with_timeout(execute(&sh("echo out; echo err >&2", &sink).build()))
        .await
        .unwrap();

    let mut lines: Vec<&str> = outcome.combined_output.lines().collect();
    lines.sort();
    assert_eq!(lines, vec!["err", "out"]);
    assert!(outcome.stdout.is_none());
    assert!(outcome.stderr.is_none());
    assert_eq!(outcome.output(OutputMode::Combined), outcome.combined_output);
}

#[tokio::test]
async fn stdout_only_mode_separates_the_streams() {
    let sink = Arc::new(MemorySink::new());

    let outcome = with_timeout(execute_capturing_stdout_only(
        &sh("echo '{\"ok\":true}'; echo 'warning: noisy' >&2", &sink).build(),
    ))
    .await
    .unwrap();

    assert_eq!(outcome.stdout.as_deref(), Some("{\"ok\":true}"));
    assert_eq!(outcome.stderr.as_deref(), Some("warning: noisy"));
    assert_eq!(outcome.output(OutputMode::StdoutOnly), "{\"ok\":true}");
    // The combined capture is still there for retry classification.
    assert!(outcome.combined_output.contains("warning: noisy"));
}

#[tokio::test]
async fn every_line_reaches_the_sink_with_the_tag_and_stream() {
    let sink = Arc::new(MemorySink::new());
    let spec = sh("echo a; echo b; echo c >&2", &sink).tag("my-test").build();

    with_timeout(execute(&spec)).await.unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.tag == "my-test"));

    let stdout: Vec<&str> = lines
        .iter()
        .filter(|l| l.stream == StreamKind::Stdout)
        .map(|l| l.text.as_str())
        .collect();
    assert_eq!(stdout, vec!["a", "b"]);
    assert!(lines
        .iter()
        .any(|l| l.stream == StreamKind::Stderr && l.text == "c"));
}

#[tokio::test]
async fn env_overrides_apply_and_ambient_env_is_inherited() {
    let sink = Arc::new(MemorySink::new());
    let spec = sh("echo \"$TOOLRUN_TEST_VAR:${PATH:+has-path}\"", &sink)
        .env("TOOLRUN_TEST_VAR", "override")
        .build();

    let outcome = with_timeout(execute(&spec)).await.unwrap();

    assert_eq!(outcome.combined_output, "override:has-path");
}

#[tokio::test]
async fn runs_in_the_requested_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
    let sink = Arc::new(MemorySink::new());

    let spec = sh("cat marker.txt", &sink).working_dir(dir.path()).build();
    let outcome = with_timeout(execute(&spec)).await.unwrap();

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.combined_output, "here");
}

#[tokio::test]
async fn stdin_is_closed() {
    let sink = Arc::new(MemorySink::new());

    // `cat` would block forever on an inherited terminal.
    let outcome = with_timeout(execute(&sh("cat; echo done", &sink).build()))
        .await
        .unwrap();

    assert_eq!(outcome.combined_output, "done");
}

#[tokio::test]
async fn output_without_trailing_newline_and_crlf_are_normalized() {
    let sink = Arc::new(MemorySink::new());

    let outcome = with_timeout(execute(&sh("printf 'first\\r\\nlast'", &sink).build()))
        .await
        .unwrap();

    assert_eq!(outcome.combined_output, "first\nlast");
}

#[tokio::test]
async fn silent_command_has_empty_output() {
    let sink = Arc::new(MemorySink::new());

    let outcome = with_timeout(execute(&sh("true", &sink).build()))
        .await
        .unwrap();

    assert_eq!(outcome.combined_output, "");
    assert!(sink.lines().is_empty());
}

#[tokio::test]
async fn timeout_kills_the_process() {
    init_tracing();
    let sink = Arc::new(MemorySink::new());
    let spec = sh("echo started; exec sleep 5", &sink)
        .timeout(Duration::from_millis(200))
        .build();

    let started = Instant::now();
    let outcome = with_timeout(execute(&spec)).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(outcome.timed_out);
    assert_eq!(outcome.exit_code, -1);
    assert!(!outcome.success());
    assert_eq!(outcome.combined_output, "started");
}

#[tokio::test]
async fn timeout_is_not_held_up_by_descendants_keeping_the_pipes_open() {
    init_tracing();
    let sink = Arc::new(MemorySink::new());
    // Without `exec`, `sleep` runs as a grandchild that inherits the pipes
    // and outlives the killed shell.
    let spec = sh("echo started; sleep 4; echo after", &sink)
        .timeout(Duration::from_millis(200))
        .build();

    let started = Instant::now();
    let outcome = with_timeout(execute(&spec)).await.unwrap();

    assert!(
        started.elapsed() < Duration::from_secs(2),
        "200ms timeout took {:?}",
        started.elapsed()
    );
    assert!(outcome.timed_out);
    assert_eq!(outcome.exit_code, -1);
    assert_eq!(outcome.combined_output, "started");
}

#[tokio::test]
async fn background_descendant_does_not_block_a_normal_exit() {
    let sink = Arc::new(MemorySink::new());
    let spec = sh("echo parent; sleep 4 & echo done", &sink).build();

    let started = Instant::now();
    let outcome = with_timeout(execute(&spec)).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());
    assert_eq!(outcome.exit_code, 0);
    assert!(!outcome.timed_out);
    assert_eq!(outcome.combined_output, "parent\ndone");
}

#[tokio::test]
async fn concurrent_operations_share_one_sink_without_mixing_lines() {
    init_tracing();
    let sink = Arc::new(MemorySink::new());
    let script = |label: &str| {
        format!("for i in 1 2 3 4 5 6 7 8 9 10; do echo {label}-line-$i; done")
    };
    let alpha = sh(&script("alpha"), &sink)
        .tag(generate_namespace("Suite Alpha").as_str())
        .build();
    let beta = sh(&script("beta"), &sink)
        .tag(generate_namespace("Suite Beta").as_str())
        .build();
    let policy = RetryPolicy::single_attempt();

    let (a, b) = with_timeout(async {
        tokio::join!(
            execute_with_retry(&RealProcessExecutor, &alpha, &policy, OutputMode::Combined),
            execute_with_retry(&RealProcessExecutor, &beta, &policy, OutputMode::Combined),
        )
    })
    .await;

    let expected = |label: &str| -> Vec<String> {
        (1..=10).map(|i| format!("{label}-line-{i}")).collect()
    };
    assert_eq!(a.unwrap().combined_output, expected("alpha").join("\n"));
    assert_eq!(b.unwrap().combined_output, expected("beta").join("\n"));

    assert_eq!(sink.lines().len(), 20);
    assert_eq!(sink.texts_for("suite-alpha"), expected("alpha"));
    assert_eq!(sink.texts_for("suite-beta"), expected("beta"));
}

#[tokio::test]
async fn missing_binary_is_a_spawn_error() {
    let spec = CommandSpec::builder("toolrun-definitely-not-installed")
        .arg("version")
        .build();

    let err = with_timeout(run_process(&spec, OutputMode::Combined))
        .await
        .unwrap_err();

    match err {
        ToolrunError::Spawn { binary, .. } => {
            assert_eq!(binary, "toolrun-definitely-not-installed")
        }
        other => panic!("expected Spawn, got {:?}", other),
    }
}

#[tokio::test]
async fn real_executor_goes_through_the_trait() {
    let sink = Arc::new(MemorySink::new());
    let spec = sh("echo via-trait", &sink).build();

    let executor: &dyn ProcessExecutor = &RealProcessExecutor;
    let outcome = with_timeout(executor.execute(&spec, OutputMode::Combined))
        .await
        .unwrap();

    assert_eq!(outcome.combined_output, "via-trait");
}
