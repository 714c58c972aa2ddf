// src/errors.rs

//! Crate-wide error types and helpers.

use thiserror::Error;

use crate::types::RunId;

#[derive(Error, Debug)]
pub enum DagrunError {
    #[error("Malformed graph: {0}")]
    MalformedGraph(String),

    #[error("Cycle detected in graph among nodes: {}", nodes.join(", "))]
    CycleDetected { nodes: Vec<String> },

    #[error("Run not found: {0}")]
    RunNotFound(RunId),

    #[error("No log for node '{node}' in run {run}")]
    LogNotFound { run: RunId, node: String },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error raised at the executor boundary.
///
/// Executors report these; the run driver records them in the node's log and
/// converts them into a `failed` node state. They never propagate out of a
/// run's event loop.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("unknown node type '{kind}' for node '{node}'")]
    UnknownNodeType { node: String, kind: String },

    #[error("missing artifact '{key}' required by node '{node}'")]
    MissingArtifact { key: String, node: String },

    #[error(transparent)]
    Domain(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DagrunError>;
