use std::collections::{BTreeMap, VecDeque};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Mutex;

use toolrun::command::CommandSpec;
use toolrun::errors::{Result, ToolrunError};
use toolrun::exec::{ExecutionOutcome, ProcessExecutor};
use toolrun::types::OutputMode;

/// What the fake saw for one `execute` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub binary: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub tag: String,
    pub mode: OutputMode,
}

impl RecordedCall {
    /// `binary args...` joined by spaces.
    pub fn command_line(&self) -> String {
        std::iter::once(self.binary.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

type Matcher = Box<dyn Fn(&CommandSpec) -> bool + Send + Sync>;

/// A fake executor that:
/// - records every spec it is asked to run
/// - answers from rules (checked first, never consumed) and then from a
///   queue of scripted outcomes
/// - repeats the `always` outcome, if set, once the queue is empty.
#[derive(Default)]
pub struct ScriptedExecutor {
    rules: Vec<(Matcher, ExecutionOutcome)>,
    queue: Mutex<VecDeque<ExecutionOutcome>>,
    always: Option<ExecutionOutcome>,
    spawn_error: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedExecutor {
    /// Answer calls with `outcomes`, in order.
    pub fn new(outcomes: Vec<ExecutionOutcome>) -> Self {
        Self {
            queue: Mutex::new(outcomes.into()),
            ..Self::default()
        }
    }

    /// Answer every call with `outcome`.
    pub fn always(outcome: ExecutionOutcome) -> Self {
        Self {
            always: Some(outcome),
            ..Self::default()
        }
    }

    /// Fail every call as if the binary could not be spawned.
    pub fn failing_to_spawn(message: &str) -> Self {
        Self {
            spawn_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Answer calls matching `matcher` with `outcome`, before consulting the
    /// queue. Such calls are still recorded.
    pub fn respond_when<F>(mut self, matcher: F, outcome: ExecutionOutcome) -> Self
    where
        F: Fn(&CommandSpec) -> bool + Send + Sync + 'static,
    {
        self.rules.push((Box::new(matcher), outcome));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn answer(&self, spec: &CommandSpec, mode: OutputMode) -> Result<ExecutionOutcome> {
        self.calls.lock().unwrap().push(RecordedCall {
            binary: spec.binary().to_string(),
            args: spec.args().to_vec(),
            env: spec.env().clone(),
            working_dir: spec.working_dir().map(PathBuf::from),
            tag: spec.tag().to_string(),
            mode,
        });

        if let Some(message) = &self.spawn_error {
            return Err(ToolrunError::Spawn {
                binary: spec.binary().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, message.clone()),
            });
        }

        if let Some((_, outcome)) = self.rules.iter().find(|(m, _)| m(spec)) {
            return Ok(outcome.clone());
        }

        if let Some(outcome) = self.queue.lock().unwrap().pop_front() {
            return Ok(outcome);
        }

        self.always.clone().ok_or_else(|| {
            anyhow::anyhow!("scripted executor has no outcome left for '{}'", spec).into()
        })
    }
}

impl ProcessExecutor for ScriptedExecutor {
    fn execute<'a>(
        &'a self,
        spec: &'a CommandSpec,
        mode: OutputMode,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionOutcome>> + Send + 'a>> {
        let answer = self.answer(spec, mode);
        Box::pin(async move { answer })
    }
}

/// Matches identity probes such as `docker compose version`.
pub fn is_probe(spec: &CommandSpec) -> bool {
    spec.args().last().map(String::as_str) == Some("version")
}
