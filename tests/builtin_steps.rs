// tests/builtin_steps.rs

//! The built-in steps, exercised through real runs on a temp directory.

use std::error::Error;

use serde_json::json;

use dagrun::config::EngineSettings;
use dagrun::engine::Orchestrator;
use dagrun::steps::builtin_registry;
use dagrun::types::NodeState;

use dagrun_test_utils::builders::GraphBuilder;
use dagrun_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn read_file_then_write_file_round_trips_contents() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.dat");
    let output = dir.path().join("output.dat");
    std::fs::write(&input, b"signal samples")?;

    let orchestrator = Orchestrator::new(builtin_registry(), EngineSettings::default());

    let graph = GraphBuilder::new()
        .with_node_metadata("ingest", "read-file", json!({ "path": input.display().to_string() }))
        .with_node_metadata("export", "write-file", json!({ "path": output.display().to_string() }))
        .with_edge("ingest", "export")
        .build();

    let run_id = orchestrator.submit(graph)?;
    let summary = with_timeout(orchestrator.wait(&run_id)).await?;

    assert!(summary.succeeded);
    assert_eq!(std::fs::read(&output)?, b"signal samples");

    let log = orchestrator.node_log(&run_id, "ingest")?;
    assert!(log.contains("loaded 14 bytes"));

    Ok(())
}

#[tokio::test]
async fn read_file_missing_input_fails_node() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("does-not-exist.dat");

    let orchestrator = Orchestrator::new(builtin_registry(), EngineSettings::default());

    let graph = GraphBuilder::new()
        .with_node_metadata("ingest", "read-file", json!({ "path": missing.display().to_string() }))
        .build();

    let run_id = orchestrator.submit(graph)?;
    let summary = with_timeout(orchestrator.wait(&run_id)).await?;

    assert!(!summary.succeeded);
    assert_eq!(summary.status["ingest"], NodeState::Failed);
    assert!(orchestrator.node_log(&run_id, "ingest")?.contains("step failed"));

    Ok(())
}

#[tokio::test]
async fn write_file_without_producer_reports_missing_artifact() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("output.dat");

    let orchestrator = Orchestrator::new(builtin_registry(), EngineSettings::default());

    let graph = GraphBuilder::new()
        .with_node_metadata("export", "write-file", json!({ "path": output.display().to_string() }))
        .build();

    let run_id = orchestrator.submit(graph)?;
    let summary = with_timeout(orchestrator.wait(&run_id)).await?;

    assert!(!summary.succeeded);
    let log = orchestrator.node_log(&run_id, "export")?;
    assert!(log.contains("missing artifact 'primary-artifact'"));
    assert!(!output.exists());

    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn command_step_captures_stdout_in_node_log() -> TestResult {
    init_tracing();

    let orchestrator = Orchestrator::new(builtin_registry(), EngineSettings::default());

    let graph = GraphBuilder::new()
        .with_node_metadata("greet", "command", json!({ "cmd": "echo hello-from-dagrun" }))
        .build();

    let run_id = orchestrator.submit(graph)?;
    let summary = with_timeout(orchestrator.wait(&run_id)).await?;

    assert!(summary.succeeded);
    let log = orchestrator.node_log(&run_id, "greet")?;
    assert!(log.contains("hello-from-dagrun"));
    assert!(log.contains("command exited with code 0"));

    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn command_step_nonzero_exit_fails_node() -> TestResult {
    init_tracing();

    let orchestrator = Orchestrator::new(builtin_registry(), EngineSettings::default());

    let graph = GraphBuilder::new()
        .with_node_metadata("boom", "command", json!({ "cmd": "exit 3" }))
        .with_node("after", "command")
        .with_edge("boom", "after")
        .build();

    let run_id = orchestrator.submit(graph)?;
    let summary = with_timeout(orchestrator.wait(&run_id)).await?;

    assert!(!summary.succeeded);
    assert_eq!(summary.status["boom"], NodeState::Failed);
    assert_eq!(summary.status["after"], NodeState::Skipped);
    assert!(
        orchestrator
            .node_log(&run_id, "boom")?
            .contains("exited with code 3")
    );

    Ok(())
}
