// src/tool/resolver.rs

//! Picking one invocation form among several equivalent candidates.
//!
//! Candidates are listed most-preferred first. The first candidate whose
//! probe succeeds wins. When every probe fails we fall back to the **last**
//! candidate (the legacy form) instead of erroring: probes are unreliable in
//! locked-down CI images, and if the tool really is missing the actual
//! command will fail loudly enough.
//!
//! A [`ToolResolver`] caches its answer, so all operations (and all retry
//! attempts) issued through it use the same form. It is owned by the caller,
//! never a process-wide global.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::command::{CommandSpec, NullSink};
use crate::errors::{Result, ToolrunError};
use crate::exec::ProcessExecutor;
use crate::types::OutputMode;

use super::form::InvocationForm;

/// What a probe found out about one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeVerdict {
    Supported,
    /// The probe failed. Could mean "not installed", could mean the probe
    /// itself misbehaved; we can't tell and don't try to.
    Inconclusive { reason: String },
}

impl ProbeVerdict {
    pub fn is_supported(&self) -> bool {
        matches!(self, ProbeVerdict::Supported)
    }
}

/// Asynchronous availability check for an invocation form.
pub trait ToolProbe: Send + Sync {
    fn probe<'a>(
        &'a self,
        form: &'a InvocationForm,
    ) -> Pin<Box<dyn Future<Output = ProbeVerdict> + Send + 'a>>;
}

/// Probe that runs `<form> <version_arg>` once, without retries, through a
/// [`ProcessExecutor`]. Exit code zero means supported.
pub struct CommandProbe<'e, E: ?Sized> {
    executor: &'e E,
    version_arg: String,
}

impl<'e, E: ProcessExecutor + ?Sized> CommandProbe<'e, E> {
    pub fn new(executor: &'e E) -> Self {
        Self {
            executor,
            version_arg: "version".to_string(),
        }
    }

    pub fn with_version_arg(mut self, arg: impl Into<String>) -> Self {
        self.version_arg = arg.into();
        self
    }
}

impl<E: ProcessExecutor + ?Sized> ToolProbe for CommandProbe<'_, E> {
    fn probe<'a>(
        &'a self,
        form: &'a InvocationForm,
    ) -> Pin<Box<dyn Future<Output = ProbeVerdict> + Send + 'a>> {
        Box::pin(async move {
            let spec = CommandSpec::builder(form.binary())
                .args(form.probe_args(&self.version_arg))
                .sink(std::sync::Arc::new(NullSink))
                .tag("probe")
                .build();

            match self.executor.execute(&spec, OutputMode::Combined).await {
                Ok(outcome) if outcome.success() => ProbeVerdict::Supported,
                Ok(outcome) => ProbeVerdict::Inconclusive {
                    reason: format!("'{}' exited with code {}", spec, outcome.exit_code),
                },
                Err(err) => ProbeVerdict::Inconclusive {
                    reason: err.to_string(),
                },
            }
        })
    }
}

/// Synchronous resolution with a plain predicate.
///
/// Returns the first candidate for which `probe` is true, or the last
/// candidate if none is.
pub fn resolve_form<F>(candidates: &[InvocationForm], mut probe: F) -> Result<InvocationForm>
where
    F: FnMut(&InvocationForm) -> bool,
{
    for form in candidates {
        if probe(form) {
            debug!(%form, "invocation form supported");
            return Ok(form.clone());
        }
        debug!(%form, "invocation form probe inconclusive");
    }
    fallback(candidates)
}

/// Same as [`resolve_form`], with an asynchronous [`ToolProbe`].
pub async fn resolve_with_probe(
    candidates: &[InvocationForm],
    probe: &dyn ToolProbe,
) -> Result<InvocationForm> {
    for form in candidates {
        match probe.probe(form).await {
            ProbeVerdict::Supported => {
                debug!(%form, "invocation form supported");
                return Ok(form.clone());
            }
            ProbeVerdict::Inconclusive { reason } => {
                debug!(%form, %reason, "invocation form probe inconclusive");
            }
        }
    }
    fallback(candidates)
}

fn fallback(candidates: &[InvocationForm]) -> Result<InvocationForm> {
    let last = candidates.last().ok_or(ToolrunError::NoCandidateForms)?;
    if candidates.len() > 1 {
        warn!(
            form = %last,
            "no invocation form passed its probe; falling back to the legacy form"
        );
    }
    Ok(last.clone())
}

/// Resolves a fixed candidate list at most once and remembers the answer.
#[derive(Debug)]
pub struct ToolResolver {
    candidates: Vec<InvocationForm>,
    resolved: OnceCell<InvocationForm>,
}

impl ToolResolver {
    pub fn new(candidates: Vec<InvocationForm>) -> Self {
        Self {
            candidates,
            resolved: OnceCell::new(),
        }
    }

    pub fn candidates(&self) -> &[InvocationForm] {
        &self.candidates
    }

    /// The cached form, if resolution already happened.
    pub fn resolved(&self) -> Option<&InvocationForm> {
        self.resolved.get()
    }

    /// Resolve (probing only on the first call) and return the chosen form.
    pub async fn resolve(&self, probe: &dyn ToolProbe) -> Result<&InvocationForm> {
        self.resolved
            .get_or_try_init(|| async {
                let form = resolve_with_probe(&self.candidates, probe).await?;
                info!(%form, "resolved tool invocation form");
                Ok::<_, ToolrunError>(form)
            })
            .await
    }
}
