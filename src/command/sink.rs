// src/command/sink.rs

//! Output sinks: where child output goes while it is being captured.
//!
//! A sink is shared by every operation of a test (and often by several tests
//! at once), so implementations must accept interleaved writes from many
//! tasks. Writes are append-only and one line at a time; nothing ever reads
//! a sink back.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::logging::OUTPUT_TARGET;
use crate::types::StreamKind;

/// Line-oriented, append-only destination for child process output.
pub trait LogSink: Send + Sync + Debug {
    /// Record one line of output. `tag` identifies the test the line belongs to.
    fn line(&self, tag: &str, stream: StreamKind, line: &str);
}

/// Default sink: forwards every line as a `tracing` event.
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn line(&self, tag: &str, stream: StreamKind, line: &str) {
        info!(target: OUTPUT_TARGET, test = %tag, %stream, "{}", line);
    }
}

/// Discards everything. Used for probes, whose output nobody wants to see.
#[derive(Debug, Clone, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn line(&self, _tag: &str, _stream: StreamKind, _line: &str) {}
}

/// One line captured by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkLine {
    pub tag: String,
    pub stream: StreamKind,
    pub text: String,
}

/// Keeps every line in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<SinkLine>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines written so far.
    pub fn lines(&self) -> Vec<SinkLine> {
        match self.lines.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Just the text of every line written under `tag`.
    pub fn texts_for(&self, tag: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.tag == tag)
            .map(|l| l.text)
            .collect()
    }
}

impl LogSink for MemorySink {
    fn line(&self, tag: &str, stream: StreamKind, line: &str) {
        let entry = SinkLine {
            tag: tag.to_string(),
            stream,
            text: line.to_string(),
        };
        match self.lines.lock() {
            Ok(mut guard) => guard.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

/// Shared handle to a sink, as stored on a `CommandSpec`.
pub type SharedSink = Arc<dyn LogSink>;

/// The sink used when a caller doesn't supply one.
pub fn default_sink() -> SharedSink {
    Arc::new(TracingSink)
}
