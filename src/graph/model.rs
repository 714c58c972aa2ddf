// src/graph/model.rs

use serde::{Deserialize, Serialize};

/// Free-form configuration attached to a node.
///
/// Opaque to the engine; only the node's executor interprets it.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One unit of work in a submitted graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique (within the graph) identifier, e.g. `"notch-filter-1"`.
    pub id: String,

    /// Executor selector, e.g. `"read-file"` or `"command"`.
    ///
    /// Whether an executor is actually registered for this type is not
    /// checked at submission; an unregistered type fails the node at
    /// execution time.
    #[serde(rename = "type")]
    pub kind: String,

    /// Configuration consumed only by the executor.
    #[serde(default)]
    pub metadata: Metadata,
}

/// A dependency edge: `target` depends on `source`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

/// A submitted graph: node list plus edge list.
///
/// This is a plain data holder; use [`crate::graph::validate_graph`] before
/// handing it to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Node ids in submission order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }
}
