// src/dag/node_info.rs

//! Node bookkeeping and per-run state.

use crate::engine::NodeId;
use crate::graph::{Metadata, Node};
use crate::types::{NodeState, RunId};

/// Static node information from the submitted graph, plus per-run state.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub name: NodeId,
    pub kind: String,
    pub metadata: Metadata,
    /// Direct dependencies of this node (sources of its incoming edges).
    pub deps: Vec<NodeId>,
    /// Current state within the run.
    pub state: NodeState,
}

impl NodeInfo {
    pub fn from_node(node: &Node, deps: Vec<NodeId>) -> Self {
        Self {
            name: node.id.clone(),
            kind: node.kind.clone(),
            metadata: node.metadata.clone(),
            deps,
            state: NodeState::Pending,
        }
    }
}

/// Description of a node that the scheduler wants the launcher to run now.
#[derive(Debug, Clone)]
pub struct ScheduledNode {
    pub name: NodeId,
    pub kind: String,
    pub metadata: Metadata,
    /// The run this dispatch belongs to.
    pub run_id: RunId,
}

impl ScheduledNode {
    pub fn from_node_info(info: &NodeInfo, run_id: RunId) -> Self {
        Self {
            name: info.name.clone(),
            kind: info.kind.clone(),
            metadata: info.metadata.clone(),
            run_id,
        }
    }
}
