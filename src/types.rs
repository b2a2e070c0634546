use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Which captured text an operation hands back to its caller.
///
/// - `Combined`: stdout and stderr interleaved in arrival order (default).
/// - `StdoutOnly`: only stdout. Stderr is still streamed to the log sink and
///   kept on the outcome, it just isn't part of the returned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Combined,
    StdoutOnly,
}

impl Default for OutputMode {
    fn default() -> Self {
        OutputMode::Combined
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "combined" => Ok(OutputMode::Combined),
            "stdout_only" | "stdout" => Ok(OutputMode::StdoutOnly),
            other => Err(format!(
                "invalid output mode: {other} (expected \"combined\" or \"stdout_only\")"
            )),
        }
    }
}

/// The child stream a captured line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => f.write_str("stdout"),
            StreamKind::Stderr => f.write_str("stderr"),
        }
    }
}
