// src/exec/process.rs

//! Running one command attempt as a real child process.

use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::command::{CommandSpec, SharedSink};
use crate::errors::{Result, ToolrunError};
use crate::types::{OutputMode, StreamKind};

use super::outcome::ExecutionOutcome;

/// How long output may keep arriving once the child itself has exited.
pub const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Run `spec` to completion, capturing its output.
///
/// Every line is written to the spec's sink as soon as it is read, and also
/// buffered for the returned outcome. Stdin is closed.
pub async fn run_process(spec: &CommandSpec, mode: OutputMode) -> Result<ExecutionOutcome> {
    info!(
        command = %spec,
        dir = ?spec.working_dir(),
        test = %spec.tag(),
        "starting process"
    );

    let mut cmd = Command::new(spec.binary());
    cmd.args(spec.args())
        .envs(spec.env())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = spec.working_dir() {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|source| ToolrunError::Spawn {
        binary: spec.binary().to_string(),
        source,
    })?;

    // Both pipes feed one channel so the combined output keeps arrival order.
    let (line_tx, line_rx) = mpsc::unbounded_channel::<(StreamKind, String)>();
    let mut readers = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        readers.push(tokio::spawn(forward_lines(
            stdout,
            StreamKind::Stdout,
            line_tx.clone(),
        )));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(tokio::spawn(forward_lines(
            stderr,
            StreamKind::Stderr,
            line_tx.clone(),
        )));
    }
    drop(line_tx);

    let mut collector = tokio::spawn(collect_lines(
        line_rx,
        spec.sink().clone(),
        spec.tag().to_string(),
        mode,
    ));

    let (exit_code, timed_out) = wait_for_exit(&mut child, spec).await?;

    // Processes the child left behind may keep the pipes open forever. Give
    // the readers a moment to drain, then stop them so the collector sees the
    // channel close.
    let capture = match tokio::time::timeout(OUTPUT_DRAIN_GRACE, &mut collector).await {
        Ok(joined) => joined,
        Err(_) => {
            warn!(
                command = %spec,
                grace = ?OUTPUT_DRAIN_GRACE,
                "output pipes still open after exit; a descendant process holds them"
            );
            for reader in &readers {
                reader.abort();
            }
            collector.await
        }
    }
    .with_context(|| format!("collecting output of '{}'", spec))?;

    info!(
        command = %spec,
        exit_code,
        timed_out,
        success = exit_code == 0 && !timed_out,
        "process exited"
    );

    Ok(capture.into_outcome(exit_code, timed_out, mode))
}

/// Convenience for [`run_process`] in [`OutputMode::Combined`].
pub async fn execute(spec: &CommandSpec) -> Result<ExecutionOutcome> {
    run_process(spec, OutputMode::Combined).await
}

/// Convenience for [`run_process`] in [`OutputMode::StdoutOnly`].
pub async fn execute_capturing_stdout_only(spec: &CommandSpec) -> Result<ExecutionOutcome> {
    run_process(spec, OutputMode::StdoutOnly).await
}

async fn wait_for_exit(child: &mut Child, spec: &CommandSpec) -> Result<(i32, bool)> {
    let Some(limit) = spec.timeout() else {
        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for process '{}'", spec))?;
        return Ok((status.code().unwrap_or(-1), false));
    };

    match tokio::time::timeout(limit, child.wait()).await {
        Ok(status) => {
            let status = status.with_context(|| format!("waiting for process '{}'", spec))?;
            Ok((status.code().unwrap_or(-1), false))
        }
        Err(_) => {
            warn!(command = %spec, timeout = ?limit, "process timed out; killing it");
            if let Err(e) = child.kill().await {
                warn!(command = %spec, error = %e, "failed to kill timed out process");
            }
            Ok((-1, true))
        }
    }
}

/// Read `reader` line by line until EOF. Invalid UTF-8 is replaced rather
/// than ending the stream.
async fn forward_lines<R>(
    reader: R,
    kind: StreamKind,
    tx: mpsc::UnboundedSender<(StreamKind, String)>,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                while matches!(buf.last(), Some(b'\n' | b'\r')) {
                    buf.pop();
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                if tx.send((kind, line)).is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!(stream = %kind, error = %e, "stopped reading child output");
                break;
            }
        }
    }
}

#[derive(Default)]
struct Capture {
    combined: Vec<String>,
    stdout: Vec<String>,
    stderr: Vec<String>,
}

impl Capture {
    fn into_outcome(self, exit_code: i32, timed_out: bool, mode: OutputMode) -> ExecutionOutcome {
        let (stdout, stderr) = match mode {
            OutputMode::StdoutOnly => (Some(self.stdout.join("\n")), Some(self.stderr.join("\n"))),
            OutputMode::Combined => (None, None),
        };
        ExecutionOutcome {
            exit_code,
            combined_output: self.combined.join("\n"),
            stdout,
            stderr,
            timed_out,
        }
    }
}

async fn collect_lines(
    mut rx: mpsc::UnboundedReceiver<(StreamKind, String)>,
    sink: SharedSink,
    tag: String,
    mode: OutputMode,
) -> Capture {
    let mut capture = Capture::default();

    while let Some((kind, line)) = rx.recv().await {
        sink.line(&tag, kind, &line);

        if mode == OutputMode::StdoutOnly {
            match kind {
                StreamKind::Stdout => capture.stdout.push(line.clone()),
                StreamKind::Stderr => capture.stderr.push(line.clone()),
            }
        }
        capture.combined.push(line);
    }

    capture
}
