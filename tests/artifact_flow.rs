// tests/artifact_flow.rs

//! Artifact store semantics, both directly and through whole runs.

use std::error::Error;
use std::sync::{Arc, Mutex};

use dagrun::config::EngineSettings;
use dagrun::engine::Orchestrator;
use dagrun::errors::StepError;
use dagrun::exec::ExecutorRegistry;
use dagrun::store::{ArtifactStore, PRIMARY_ARTIFACT};
use dagrun::types::NodeState;

use dagrun_test_utils::builders::GraphBuilder;
use dagrun_test_utils::fake_steps::{PutArtifactStep, ReadArtifactStep};
use dagrun_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn store_round_trips_values_by_key() {
    let store = ArtifactStore::new();
    assert!(store.is_empty());

    store.insert_value("samples", String::from("raw data"));
    store.insert_value("channels", 32usize);

    let samples = store.require_as::<String>("samples", "reader").unwrap();
    assert_eq!(*samples, "raw data");

    let channels = store.require_as::<usize>("channels", "reader").unwrap();
    assert_eq!(*channels, 32);

    assert_eq!(store.keys(), vec!["channels".to_string(), "samples".to_string()]);
}

#[test]
fn missing_key_names_key_and_requesting_node() {
    let store = ArtifactStore::new();

    let err = store.require("primary-artifact", "exporter").unwrap_err();
    match err {
        StepError::MissingArtifact { key, node } => {
            assert_eq!(key, "primary-artifact");
            assert_eq!(node, "exporter");
        }
        other => panic!("expected MissingArtifact, got {other:?}"),
    }
}

#[test]
fn type_mismatch_reads_as_missing() {
    let store = ArtifactStore::new();
    store.insert_value("samples", 42usize);

    let err = store.require_as::<String>("samples", "reader").unwrap_err();
    assert!(matches!(err, StepError::MissingArtifact { .. }));
}

#[tokio::test]
async fn artifact_written_by_upstream_is_read_by_downstream() -> TestResult {
    init_tracing();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = ExecutorRegistry::new()
        .with("put", Arc::new(PutArtifactStep::new(PRIMARY_ARTIFACT, "hello")))
        .with(
            "take",
            Arc::new(ReadArtifactStep::new(PRIMARY_ARTIFACT, Arc::clone(&seen))),
        );
    let orchestrator = Orchestrator::new(registry, EngineSettings::default());

    let graph = GraphBuilder::new()
        .with_node("A", "put")
        .with_node("B", "take")
        .with_edge("A", "B")
        .build();

    let run_id = orchestrator.submit(graph)?;
    let summary = with_timeout(orchestrator.wait(&run_id)).await?;

    assert!(summary.succeeded);
    assert_eq!(seen.lock().unwrap().clone(), vec!["hello".to_string()]);

    Ok(())
}

#[tokio::test]
async fn downstream_sees_the_latest_overwrite() -> TestResult {
    init_tracing();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = ExecutorRegistry::new()
        .with("put-v1", Arc::new(PutArtifactStep::new(PRIMARY_ARTIFACT, "v1")))
        .with("put-v2", Arc::new(PutArtifactStep::new(PRIMARY_ARTIFACT, "v2")))
        .with(
            "take",
            Arc::new(ReadArtifactStep::new(PRIMARY_ARTIFACT, Arc::clone(&seen))),
        );
    let orchestrator = Orchestrator::new(registry, EngineSettings::default());

    let graph = GraphBuilder::new()
        .with_node("load", "put-v1")
        .with_node("filter", "put-v2")
        .with_node("export", "take")
        .with_edge("load", "filter")
        .with_edge("filter", "export")
        .build();

    let run_id = orchestrator.submit(graph)?;
    let summary = with_timeout(orchestrator.wait(&run_id)).await?;

    assert!(summary.succeeded);
    assert_eq!(seen.lock().unwrap().clone(), vec!["v2".to_string()]);

    Ok(())
}

#[tokio::test]
async fn missing_artifact_fails_the_consumer_node() -> TestResult {
    init_tracing();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = ExecutorRegistry::new().with(
        "take",
        Arc::new(ReadArtifactStep::new(PRIMARY_ARTIFACT, Arc::clone(&seen))),
    );
    let orchestrator = Orchestrator::new(registry, EngineSettings::default());

    // No producer: the consumer runs first and finds nothing.
    let graph = GraphBuilder::new().with_node("export", "take").build();

    let run_id = orchestrator.submit(graph)?;
    let summary = with_timeout(orchestrator.wait(&run_id)).await?;

    assert!(!summary.succeeded);
    assert_eq!(summary.status["export"], NodeState::Failed);

    let log = orchestrator.node_log(&run_id, "export")?;
    assert!(log.contains("missing artifact 'primary-artifact'"));
    assert!(log.contains("export"));

    Ok(())
}

#[tokio::test]
async fn retained_artifacts_are_inspectable_after_the_run() -> TestResult {
    init_tracing();

    let registry = ExecutorRegistry::new()
        .with("put", Arc::new(PutArtifactStep::new(PRIMARY_ARTIFACT, "kept")));

    let mut settings = EngineSettings::default();
    settings.retain_artifacts = true;
    let orchestrator = Orchestrator::new(registry, settings);

    let graph = GraphBuilder::new().with_node("A", "put").build();

    let run_id = orchestrator.submit(graph)?;
    with_timeout(orchestrator.wait(&run_id)).await?;

    let store = orchestrator
        .artifacts(&run_id)
        .expect("artifacts retained by configuration");
    let value = store.require_as::<String>(PRIMARY_ARTIFACT, "inspector").unwrap();
    assert_eq!(*value, "kept");

    Ok(())
}

#[tokio::test]
async fn artifacts_are_reclaimed_by_default() -> TestResult {
    init_tracing();

    let registry = ExecutorRegistry::new()
        .with("put", Arc::new(PutArtifactStep::new(PRIMARY_ARTIFACT, "gone")));
    let orchestrator = Orchestrator::new(registry, EngineSettings::default());

    let graph = GraphBuilder::new().with_node("A", "put").build();

    let run_id = orchestrator.submit(graph)?;
    with_timeout(orchestrator.wait(&run_id)).await?;

    assert!(orchestrator.artifacts(&run_id).is_none());

    Ok(())
}

#[tokio::test]
async fn sibling_branches_can_use_independent_keys() -> TestResult {
    init_tracing();

    let seen_left = Arc::new(Mutex::new(Vec::new()));
    let seen_right = Arc::new(Mutex::new(Vec::new()));
    let registry = ExecutorRegistry::new()
        .with("put-left", Arc::new(PutArtifactStep::new("left", "L")))
        .with("put-right", Arc::new(PutArtifactStep::new("right", "R")))
        .with(
            "take-left",
            Arc::new(ReadArtifactStep::new("left", Arc::clone(&seen_left))),
        )
        .with(
            "take-right",
            Arc::new(ReadArtifactStep::new("right", Arc::clone(&seen_right))),
        );
    let orchestrator = Orchestrator::new(registry, EngineSettings::default());

    // Two branches that never touch each other's slot.
    let graph = GraphBuilder::new()
        .with_node("a1", "put-left")
        .with_node("a2", "take-left")
        .with_node("b1", "put-right")
        .with_node("b2", "take-right")
        .with_edge("a1", "a2")
        .with_edge("b1", "b2")
        .build();

    let run_id = orchestrator.submit(graph)?;
    let summary = with_timeout(orchestrator.wait(&run_id)).await?;

    assert!(summary.succeeded);
    assert_eq!(seen_left.lock().unwrap().clone(), vec!["L".to_string()]);
    assert_eq!(seen_right.lock().unwrap().clone(), vec!["R".to_string()]);

    Ok(())
}
