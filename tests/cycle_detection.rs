// tests/cycle_detection.rs

//! Submission-time rejection: structural validation and cycle detection.

use std::error::Error;
use std::sync::{Arc, Mutex};

use dagrun::config::EngineSettings;
use dagrun::engine::Orchestrator;
use dagrun::errors::DagrunError;
use dagrun::exec::ExecutorRegistry;

use dagrun_test_utils::builders::GraphBuilder;
use dagrun_test_utils::fake_steps::{RecordingStep, test_registry};
use dagrun_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn two_node_cycle_is_rejected_naming_both_nodes() -> TestResult {
    init_tracing();

    let orchestrator = Orchestrator::new(test_registry(), EngineSettings::default());

    let graph = GraphBuilder::new()
        .with_node("A", "noop")
        .with_node("B", "noop")
        .with_edge("A", "B")
        .with_edge("B", "A")
        .build();

    let err = orchestrator.submit(graph).unwrap_err();
    match err {
        DagrunError::CycleDetected { nodes } => {
            assert_eq!(nodes, vec!["A".to_string(), "B".to_string()]);
        }
        other => panic!("expected CycleDetected, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn cycle_error_names_only_the_unreachable_nodes() -> TestResult {
    init_tracing();

    let orchestrator = Orchestrator::new(test_registry(), EngineSettings::default());

    // A -> B is fine; C and D form a cycle.
    let graph = GraphBuilder::new()
        .with_node("A", "noop")
        .with_node("B", "noop")
        .with_node("C", "noop")
        .with_node("D", "noop")
        .with_edge("A", "B")
        .with_edge("C", "D")
        .with_edge("D", "C")
        .build();

    let err = orchestrator.submit(graph).unwrap_err();
    match err {
        DagrunError::CycleDetected { nodes } => {
            assert_eq!(nodes, vec!["C".to_string(), "D".to_string()]);
        }
        other => panic!("expected CycleDetected, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn cyclic_submission_never_executes_any_node() -> TestResult {
    init_tracing();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let registry = ExecutorRegistry::new()
        .with("record", Arc::new(RecordingStep::new(Arc::clone(&executed))));
    let orchestrator = Orchestrator::new(registry, EngineSettings::default());

    let graph = GraphBuilder::new()
        .with_node("A", "record")
        .with_node("B", "record")
        .with_edge("A", "B")
        .with_edge("B", "A")
        .build();

    assert!(orchestrator.submit(graph).is_err());

    // Rejection happens before a run exists; no executor ever fires.
    assert!(executed.lock().unwrap().is_empty());

    Ok(())
}

#[test]
fn self_loop_is_rejected_as_malformed() {
    let graph = GraphBuilder::new()
        .with_node("A", "noop")
        .with_edge("A", "A")
        .build_unchecked();

    let err = dagrun::graph::validate_graph(&graph).unwrap_err();
    assert!(matches!(err, DagrunError::MalformedGraph(_)));
}

#[test]
fn edge_to_undeclared_node_is_rejected_as_malformed() {
    let graph = GraphBuilder::new()
        .with_node("A", "noop")
        .with_edge("A", "ghost")
        .build_unchecked();

    let err = dagrun::graph::validate_graph(&graph).unwrap_err();
    match err {
        DagrunError::MalformedGraph(msg) => assert!(msg.contains("ghost")),
        other => panic!("expected MalformedGraph, got {other:?}"),
    }
}

#[test]
fn duplicate_node_id_is_rejected_as_malformed() {
    let graph = GraphBuilder::new()
        .with_node("A", "noop")
        .with_node("A", "noop")
        .build_unchecked();

    let err = dagrun::graph::validate_graph(&graph).unwrap_err();
    assert!(matches!(err, DagrunError::MalformedGraph(_)));
}

#[test]
fn duplicate_edges_are_harmless() {
    let graph = GraphBuilder::new()
        .with_node("A", "noop")
        .with_node("B", "noop")
        .with_edge("A", "B")
        .with_edge("A", "B")
        .build();

    // The duplicate collapses in the adjacency; the order is still valid.
    let dag = dagrun::dag::DagGraph::from_graph(&graph);
    let order = dag.topo_order().expect("duplicate edges must not fake a cycle");
    assert_eq!(order, vec!["A".to_string(), "B".to_string()]);
}
