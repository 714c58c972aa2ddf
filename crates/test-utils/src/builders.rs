#![allow(dead_code)]

use dagrun::graph::{Edge, Graph, Metadata, Node};

/// Builder for [`Graph`] to simplify test setup.
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Add a node with empty metadata.
    pub fn with_node(mut self, id: &str, kind: &str) -> Self {
        self.nodes.push(Node {
            id: id.to_string(),
            kind: kind.to_string(),
            metadata: Metadata::new(),
        });
        self
    }

    /// Add a node with metadata given as a JSON object literal.
    ///
    /// Panics if `metadata` is not a JSON object.
    pub fn with_node_metadata(
        mut self,
        id: &str,
        kind: &str,
        metadata: serde_json::Value,
    ) -> Self {
        let serde_json::Value::Object(metadata) = metadata else {
            panic!("node metadata must be a JSON object");
        };
        self.nodes.push(Node {
            id: id.to_string(),
            kind: kind.to_string(),
            metadata,
        });
        self
    }

    /// Add a dependency edge: `target` depends on `source`.
    pub fn with_edge(mut self, source: &str, target: &str) -> Self {
        self.edges.push(Edge {
            source: source.to_string(),
            target: target.to_string(),
        });
        self
    }

    /// Build without validating, for tests that exercise validation itself.
    pub fn build_unchecked(self) -> Graph {
        Graph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }

    /// Build and structurally validate.
    pub fn build(self) -> Graph {
        let graph = self.build_unchecked();
        dagrun::graph::validate_graph(&graph).expect("Failed to build valid graph from builder");
        graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
