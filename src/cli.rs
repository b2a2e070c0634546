// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `toolrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "toolrun",
    version,
    about = "Run flaky infrastructure tools with namespacing and bounded retries.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TOOLRUN_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run a command through the retry controller and print its output.
    Run(RunArgs),

    /// Print the namespace generated for a test name.
    Namespace {
        /// Human-readable test name.
        name: String,
    },

    /// Probe which invocation form of a tool is installed.
    Resolve {
        #[arg(value_enum)]
        tool: ToolKind,
    },
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Path to the config file (TOML). Defaults apply if it doesn't exist.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Test identity used to tag output lines.
    #[arg(long, value_name = "NAME", default_value = "toolrun")]
    pub name: String,

    /// Print only stdout instead of stdout and stderr combined.
    #[arg(long)]
    pub stdout_only: bool,

    /// The command to run, e.g. `-- docker compose up -d`.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Tools with more than one invocation form.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum ToolKind {
    Compose,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
