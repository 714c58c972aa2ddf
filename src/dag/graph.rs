// src/dag/graph.rs

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::engine::NodeId;
use crate::errors::{DagrunError, Result};
use crate::graph::Graph;

/// In-memory adjacency view of a structurally-validated [`Graph`].
///
/// Backed by a petgraph `DiGraph` with edge direction dep -> dependent, plus
/// a submission-order node list so that scheduling stays deterministic.
/// Duplicate edges in the submission collapse to a single adjacency edge.
#[derive(Debug, Clone)]
pub struct DagGraph {
    graph: DiGraph<NodeId, ()>,
    indices: HashMap<NodeId, NodeIndex>,
    /// Node ids in the order they appeared in the submitted node list.
    order: Vec<NodeId>,
}

impl DagGraph {
    /// Build the adjacency view from a validated [`Graph`].
    ///
    /// Assumes all edge endpoints reference declared nodes and there are no
    /// self-loops (see [`crate::graph::validate_graph`]). Cycles are *not*
    /// assumed absent; call [`DagGraph::topo_order`] to check.
    pub fn from_graph(spec: &Graph) -> Self {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();
        let mut order = Vec::with_capacity(spec.nodes.len());

        for node in &spec.nodes {
            let idx = graph.add_node(node.id.clone());
            indices.insert(node.id.clone(), idx);
            order.push(node.id.clone());
        }

        for edge in &spec.edges {
            let src = indices[&edge.source];
            let tgt = indices[&edge.target];
            graph.update_edge(src, tgt, ());
        }

        Self {
            graph,
            indices,
            order,
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Node ids in submission order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Immediate dependencies of a node (sources of its incoming edges).
    pub fn dependencies_of(&self, id: &str) -> Vec<NodeId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Immediate dependents of a node (targets of its outgoing edges).
    pub fn dependents_of(&self, id: &str) -> Vec<NodeId> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: &str, dir: Direction) -> Vec<NodeId> {
        match self.indices.get(id) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, dir)
                .map(|n| self.graph[n].clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Compute a total order consistent with every edge (Kahn's algorithm).
    ///
    /// Ties among co-ready nodes break by submission order, so the result is
    /// deterministic for a given submission. If the produced order is shorter
    /// than the node count, the unvisited remainder forms at least one cycle;
    /// the error names that exact node set, in submission order.
    pub fn topo_order(&self) -> Result<Vec<NodeId>> {
        let position: HashMap<&str, usize> = self
            .order
            .iter()
            .enumerate()
            .map(|(pos, id)| (id.as_str(), pos))
            .collect();

        let mut in_degree: HashMap<&str, usize> = self
            .order
            .iter()
            .map(|id| {
                let idx = self.indices[id];
                let degree = self
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .count();
                (id.as_str(), degree)
            })
            .collect();

        // Min-heap over submission position keeps the frontier deterministic.
        let mut ready: BinaryHeap<Reverse<usize>> = self
            .order
            .iter()
            .enumerate()
            .filter(|(_, id)| in_degree[id.as_str()] == 0)
            .map(|(pos, _)| Reverse(pos))
            .collect();

        let mut sorted = Vec::with_capacity(self.order.len());

        while let Some(Reverse(pos)) = ready.pop() {
            let id = &self.order[pos];
            sorted.push(id.clone());

            for dependent in self.dependents_of(id) {
                if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(position[dependent.as_str()]));
                    }
                }
            }
        }

        if sorted.len() < self.order.len() {
            let remaining: Vec<NodeId> = self
                .order
                .iter()
                .filter(|id| !sorted.contains(*id))
                .cloned()
                .collect();
            return Err(DagrunError::CycleDetected { nodes: remaining });
        }

        Ok(sorted)
    }
}
