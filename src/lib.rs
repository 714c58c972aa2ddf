// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod graph;
pub mod logging;
pub mod status;
pub mod steps;
pub mod store;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::EngineSettings;
use crate::engine::{Orchestrator, RunSummary};
use crate::graph::Graph;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings loading
/// - the built-in executor registry
/// - the orchestrator
/// - one run of the given graph file, awaited to completion
///
/// Returns the run summary so the caller can pick its exit code.
pub async fn run(args: CliArgs) -> Result<RunSummary> {
    let settings = load_settings(args.config.as_deref())?;
    let graph = graph::load_from_path(&args.graph)?;

    if args.dry_run {
        print_dry_run(&graph);
        // A dry run reports every node as untouched.
        return Ok(RunSummary {
            run_id: types::RunId::new(),
            status: graph
                .node_ids()
                .map(|id| (id.to_string(), types::NodeState::Pending))
                .collect(),
            succeeded: true,
        });
    }

    let orchestrator = Orchestrator::new(steps::builtin_registry(), settings);

    let run_id = orchestrator.submit(graph)?;
    info!(run_id = %run_id, "run submitted");

    let summary = orchestrator.wait(&run_id).await?;

    print_summary(&summary, args.json)?;

    if args.print_logs {
        let logs = orchestrator.run_log(&run_id)?;
        print!("{logs}");
    }

    Ok(summary)
}

/// Resolve settings: explicit path > default path (if the file exists) >
/// built-in defaults.
fn load_settings(explicit: Option<&str>) -> Result<EngineSettings> {
    if let Some(path) = explicit {
        return Ok(config::load_and_validate(path)?);
    }

    let default_path = config::default_settings_path();
    if default_path.exists() {
        return Ok(config::load_and_validate(&default_path)?);
    }

    debug!("no settings file found; using built-in defaults");
    Ok(EngineSettings::default())
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&summary.status)?);
        return Ok(());
    }

    println!("run {}:", summary.run_id);
    for (node, state) in &summary.status {
        println!("  {node}: {state}");
    }
    println!(
        "outcome: {}",
        if summary.succeeded { "success" } else { "failed" }
    );

    Ok(())
}

/// Simple dry-run output: print nodes, types and dependencies.
fn print_dry_run(graph: &Graph) {
    println!("dagrun dry-run");
    println!("nodes ({}):", graph.nodes.len());

    for node in &graph.nodes {
        println!("  - {}", node.id);
        println!("      type: {}", node.kind);
        let deps: Vec<&str> = graph
            .edges
            .iter()
            .filter(|e| e.target == node.id)
            .map(|e| e.source.as_str())
            .collect();
        if !deps.is_empty() {
            println!("      after: {deps:?}");
        }
        if !node.metadata.is_empty() {
            println!("      metadata keys: {:?}", node.metadata.keys().collect::<Vec<_>>());
        }
    }

    debug!("dry-run complete (no execution)");
}
