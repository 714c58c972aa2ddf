// src/graph/loader.rs

use std::fs;
use std::path::Path;

use crate::errors::Result;
use crate::graph::model::Graph;
use crate::graph::validate::validate_graph;

/// Read a graph from a JSON file without validating it.
///
/// This only performs deserialization; use [`load_from_path`] for the
/// validated variant the rest of the application should call.
pub fn load_raw(path: impl AsRef<Path>) -> Result<Graph> {
    let contents = fs::read_to_string(path.as_ref())?;
    let graph: Graph = serde_json::from_str(&contents)?;
    Ok(graph)
}

/// Read a graph from a JSON file and run structural validation.
///
/// Cycle detection still happens at submission time inside the orchestrator,
/// where the scheduler computes a topological order.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Graph> {
    let graph = load_raw(path)?;
    validate_graph(&graph)?;
    Ok(graph)
}
