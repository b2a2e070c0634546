// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod namespace;
pub mod report;
pub mod retry;
pub mod tool;
pub mod tools;
pub mod types;

use anyhow::{Result, anyhow};
use tracing::debug;

use crate::cli::{CliArgs, Command, RunArgs, ToolKind};
use crate::command::CommandSpec;
use crate::config::load_or_default;
use crate::exec::RealProcessExecutor;
use crate::namespace::generate_namespace;
use crate::report::into_result;
use crate::retry::execute_with_retry;
use crate::tool::{CommandProbe, ToolResolver};
use crate::tools::compose_candidates;
use crate::types::OutputMode;

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Run(run_args) => run_command(run_args).await,
        Command::Namespace { name } => {
            println!("{}", generate_namespace(&name));
            Ok(())
        }
        Command::Resolve { tool } => resolve_tool(tool).await,
    }
}

/// `toolrun run`: one command, the config's retry policy, output to stdout.
async fn run_command(args: RunArgs) -> Result<()> {
    let cfg = load_or_default(&args.config)?;
    debug!(config = %args.config.display(), policy = ?cfg.retry, "loaded config");

    let (binary, rest) = args
        .command
        .split_first()
        .ok_or_else(|| anyhow!("no command given"))?;

    let namespace = generate_namespace(&args.name);
    let spec = CommandSpec::builder(binary.as_str())
        .args(rest.iter().cloned())
        .maybe_working_dir(cfg.exec.working_dir.clone())
        .envs(cfg.exec.env.clone())
        .tag(namespace.as_str())
        .maybe_timeout(cfg.exec.timeout)
        .build();

    let mode = if args.stdout_only {
        OutputMode::StdoutOnly
    } else {
        cfg.exec.output
    };

    let result = execute_with_retry(&RealProcessExecutor, &spec, &cfg.retry, mode).await;
    let output = into_result(&args.name, result, mode)?;
    println!("{output}");
    Ok(())
}

/// `toolrun resolve`: probe candidates and print the winner.
async fn resolve_tool(tool: ToolKind) -> Result<()> {
    let candidates = match tool {
        ToolKind::Compose => compose_candidates(),
    };

    let resolver = ToolResolver::new(candidates);
    let probe = CommandProbe::new(&RealProcessExecutor);
    let form = resolver.resolve(&probe).await?;
    println!("{form}");
    Ok(())
}
