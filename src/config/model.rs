// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::retry::RetryPolicy;
use crate::types::OutputMode;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [retry]
/// max_attempts = 3
/// delay = "5s"
///
/// [retry.signatures]
/// "connection reset by peer" = "flaky network"
///
/// [exec]
/// timeout = "10m"
/// working_dir = "fixtures/compose"
/// output = "combined"
///
/// [exec.env]
/// COMPOSE_HTTP_TIMEOUT = "120"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub retry: RetrySection,

    #[serde(default)]
    pub exec: ExecSection,
}

/// `[retry]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySection {
    /// Total attempts, the first one included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed pause between attempts, e.g. `"5s"` or `"500ms"`.
    /// [`DEFAULT_RETRY_DELAY`] when absent.
    #[serde(default)]
    pub delay: Option<String>,

    /// Output substring -> explanation of why it is safe to retry.
    #[serde(default)]
    pub signatures: BTreeMap<String, String>,
}

/// Attempts when `[retry].max_attempts` is absent. Retrying is opt-in.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;

/// Pause between attempts when `[retry].delay` is absent.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay: None,
            signatures: BTreeMap::new(),
        }
    }
}

/// `[exec]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExecSection {
    /// Per-attempt wall clock limit. No limit when absent.
    #[serde(default)]
    pub timeout: Option<String>,

    /// Directory commands run in, relative to the config file.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Extra environment for every command.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub output: OutputMode,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holding one means the
/// retry policy and all durations are known to be valid.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub retry: RetryPolicy,
    pub exec: ExecSettings,
}

/// Resolved `[exec]` settings.
#[derive(Debug, Clone, Default)]
pub struct ExecSettings {
    pub timeout: Option<Duration>,
    pub working_dir: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
    pub output: OutputMode,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(retry: RetryPolicy, exec: ExecSettings) -> Self {
        Self { retry, exec }
    }
}

/// Same values an empty `toolrun.toml` validates to.
impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::new_unchecked(
                DEFAULT_MAX_ATTEMPTS,
                DEFAULT_RETRY_DELAY,
                BTreeMap::new(),
            ),
            exec: ExecSettings::default(),
        }
    }
}
