// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `dagrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagrun",
    version,
    about = "Execute a DAG of processing steps from a graph file.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the graph file (JSON: node list + edge list).
    #[arg(value_name = "GRAPH")]
    pub graph: String,

    /// Path to the engine settings file (TOML).
    ///
    /// Default: `Dagrun.toml` in the current working directory, if present;
    /// built-in defaults otherwise.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Print the captured per-node logs after the run finishes.
    #[arg(long)]
    pub print_logs: bool,

    /// Print the final status mapping as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DAGRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate the graph, print its nodes, but don't execute.
    #[arg(long)]
    pub dry_run: bool,
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
