// src/command/spec.rs

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::sink::{SharedSink, default_sink};

/// Complete, immutable description of one subprocess invocation.
///
/// Built once per logical operation through [`CommandSpecBuilder`] and then
/// only ever borrowed: every retry attempt runs exactly the same spec.
///
/// `env` only lists overrides. Keys not present here are inherited from the
/// ambient process environment.
#[derive(Clone)]
pub struct CommandSpec {
    binary: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    env: BTreeMap<String, String>,
    sink: SharedSink,
    tag: String,
    timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn builder(binary: impl Into<String>) -> CommandSpecBuilder {
        CommandSpecBuilder::new(binary)
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    /// Test-identity tag attached to every line written to the sink.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Renders as a shell-like command line, for logs and error messages.
impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.binary)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("binary", &self.binary)
            .field("args", &self.args)
            .field("working_dir", &self.working_dir)
            .field("env", &self.env)
            .field("tag", &self.tag)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for [`CommandSpec`].
pub struct CommandSpecBuilder {
    binary: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    env: BTreeMap<String, String>,
    sink: Option<SharedSink>,
    tag: Option<String>,
    timeout: Option<Duration>,
}

impl CommandSpecBuilder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new(),
            working_dir: None,
            env: BTreeMap::new(),
            sink: None,
            tag: None,
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn maybe_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set one environment override. A later value for the same key wins.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.env.insert(k.into(), v.into());
        }
        self
    }

    pub fn sink(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn maybe_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> CommandSpec {
        let tag = self.tag.unwrap_or_else(|| self.binary.clone());
        CommandSpec {
            binary: self.binary,
            args: self.args,
            working_dir: self.working_dir,
            env: self.env,
            sink: self.sink.unwrap_or_else(default_sink),
            tag,
            timeout: self.timeout,
        }
    }
}
