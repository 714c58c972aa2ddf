// src/graph/validate.rs

use std::collections::HashSet;

use crate::errors::{DagrunError, Result};
use crate::graph::model::Graph;

/// Structural validation of a submitted graph.
///
/// Rejects with [`DagrunError::MalformedGraph`]:
/// - an empty node list
/// - duplicate node ids
/// - edges whose endpoints reference undeclared nodes
/// - self-loop edges
///
/// Acyclicity is deliberately *not* checked here; that happens at scheduling
/// time so that graph construction stays a cheap data-holder concern.
pub fn validate_graph(graph: &Graph) -> Result<()> {
    ensure_has_nodes(graph)?;
    validate_unique_ids(graph)?;
    validate_edge_endpoints(graph)?;
    Ok(())
}

fn ensure_has_nodes(graph: &Graph) -> Result<()> {
    if graph.nodes.is_empty() {
        return Err(DagrunError::MalformedGraph(
            "graph must contain at least one node".to_string(),
        ));
    }
    Ok(())
}

fn validate_unique_ids(graph: &Graph) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for node in &graph.nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(DagrunError::MalformedGraph(format!(
                "duplicate node id '{}'",
                node.id
            )));
        }
    }
    Ok(())
}

fn validate_edge_endpoints(graph: &Graph) -> Result<()> {
    let ids: HashSet<&str> = graph.node_ids().collect();

    for edge in &graph.edges {
        if !ids.contains(edge.source.as_str()) {
            return Err(DagrunError::MalformedGraph(format!(
                "edge references unknown source node '{}'",
                edge.source
            )));
        }
        if !ids.contains(edge.target.as_str()) {
            return Err(DagrunError::MalformedGraph(format!(
                "edge references unknown target node '{}'",
                edge.target
            )));
        }
        if edge.source == edge.target {
            return Err(DagrunError::MalformedGraph(format!(
                "node '{}' cannot depend on itself",
                edge.source
            )));
        }
    }

    Ok(())
}
