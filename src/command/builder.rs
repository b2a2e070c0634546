// src/command/builder.rs

//! Turning a logical operation into a concrete [`CommandSpec`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::namespace::Namespace;
use crate::tool::InvocationForm;

use super::sink::{SharedSink, default_sink};
use super::spec::CommandSpec;

/// Caller intent for one invocation of a tool, before a form is chosen.
///
/// The final argument list is:
///
/// ```text
/// <form leading args> <base_args> [<namespace_flag> <namespace>] <trailing_args>
/// ```
///
/// so the namespace always lands before anything the caller passes through.
#[derive(Debug, Clone, Default)]
pub struct Operation {
    pub base_args: Vec<String>,
    /// Flag that scopes tool resources, e.g. `--project-name`. When `None`
    /// the namespace is only used to tag log lines.
    pub namespace_flag: Option<String>,
    pub trailing_args: Vec<String>,
    /// Environment explicitly requested by the caller.
    pub env: BTreeMap<String, String>,
    /// Environment the operation itself requires (feature toggles and the
    /// like). Never overrides a key the caller set explicitly.
    pub mandated_env: BTreeMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl Operation {
    pub fn new<I, S>(base_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base_args: base_args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn namespace_flag(mut self, flag: impl Into<String>) -> Self {
        self.namespace_flag = Some(flag.into());
        self
    }

    pub fn trailing_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trailing_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn mandate_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.mandated_env.insert(key.into(), value.into());
        self
    }

    pub fn working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Merged environment: operation defaults first, caller values on top.
    pub fn effective_env(&self) -> BTreeMap<String, String> {
        let mut env = self.mandated_env.clone();
        env.extend(self.env.iter().map(|(k, v)| (k.clone(), v.clone())));
        env
    }

    /// Build the spec for a resolved form and a namespace.
    ///
    /// Pure: the same inputs always produce the same spec.
    pub fn to_spec(
        &self,
        form: &InvocationForm,
        namespace: &Namespace,
        sink: Option<SharedSink>,
    ) -> CommandSpec {
        let mut args = form.leading_args();
        args.extend(self.base_args.iter().cloned());
        if let Some(flag) = &self.namespace_flag {
            args.push(flag.clone());
            args.push(namespace.as_str().to_string());
        }
        args.extend(self.trailing_args.iter().cloned());

        CommandSpec::builder(form.binary())
            .args(args)
            .maybe_working_dir(self.working_dir.clone())
            .envs(self.effective_env())
            .sink(sink.unwrap_or_else(default_sink))
            .tag(namespace.as_str())
            .maybe_timeout(self.timeout)
            .build()
    }
}
