// src/dag/state_manager.rs

//! Per-run state transitions for nodes in the scheduler.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::dag::DagGraph;
use crate::dag::node_info::{NodeInfo, ScheduledNode};
use crate::engine::NodeId;
use crate::types::{NodeState, RunId};

/// Manages per-run state transitions for nodes.
pub struct StateManager<'a> {
    graph: &'a DagGraph,
    nodes: &'a mut HashMap<NodeId, NodeInfo>,
    run_id: RunId,
}

impl<'a> StateManager<'a> {
    pub fn new(
        graph: &'a DagGraph,
        nodes: &'a mut HashMap<NodeId, NodeInfo>,
        run_id: RunId,
    ) -> Self {
        Self {
            graph,
            nodes,
            run_id,
        }
    }

    /// Whether all dependencies of the given node have succeeded in this run.
    pub fn deps_satisfied_for_info(&self, info: &NodeInfo) -> bool {
        for dep_name in &info.deps {
            let dep = match self.nodes.get(dep_name) {
                Some(d) => d,
                None => {
                    // Should not happen with a validated graph.
                    warn!(
                        node = %info.name,
                        dep = %dep_name,
                        "dependency missing from nodes map"
                    );
                    return false;
                }
            };

            match dep.state {
                NodeState::Success => {}
                NodeState::Pending
                | NodeState::Running
                | NodeState::Failed
                | NodeState::Skipped => return false,
            }
        }

        true
    }

    /// Collect nodes that are `Pending` with all dependencies satisfied, mark
    /// them `Running`, and return them as `ScheduledNode`s.
    ///
    /// Candidates are visited in submission order so that scheduling is
    /// deterministic for testing.
    pub fn collect_new_ready(&mut self) -> Vec<ScheduledNode> {
        // Decide first, then mutate to avoid borrowing issues.
        let candidates: Vec<NodeId> = self
            .graph
            .node_ids()
            .filter(|id| {
                self.nodes
                    .get(*id)
                    .is_some_and(|info| {
                        info.state == NodeState::Pending && self.deps_satisfied_for_info(info)
                    })
            })
            .map(|id| id.to_string())
            .collect();

        let mut ready = Vec::with_capacity(candidates.len());

        for name in candidates {
            if let Some(info) = self.nodes.get_mut(&name) {
                debug!(
                    node = %info.name,
                    run_id = %self.run_id,
                    kind = %info.kind,
                    "dependencies satisfied; marking Running"
                );

                info.state = NodeState::Running;
                ready.push(ScheduledNode::from_node_info(info, self.run_id));
            }
        }

        ready
    }

    /// Mark every not-yet-finished transitive dependent of a failed node as
    /// `Skipped`.
    ///
    /// Returns the list of nodes newly skipped (excluding the failed node
    /// itself). A dependent that is already `Running` is left alone: it was
    /// dispatched before the failure and is allowed to finish naturally.
    pub fn mark_descendants_skipped(&mut self, failed_node: &str) -> Vec<NodeId> {
        let mut stack: Vec<NodeId> = self.graph.dependents_of(failed_node);
        let mut newly_skipped = Vec::new();

        while let Some(name) = stack.pop() {
            if let Some(info) = self.nodes.get_mut(&name) {
                match info.state {
                    NodeState::Pending => {
                        info.state = NodeState::Skipped;
                        debug!(
                            node = %info.name,
                            run_id = %self.run_id,
                            "skipping dependent due to upstream failure"
                        );
                        newly_skipped.push(info.name.clone());
                        stack.extend(self.graph.dependents_of(&name));
                    }
                    NodeState::Running
                    | NodeState::Success
                    | NodeState::Failed
                    | NodeState::Skipped => {
                        // Already dispatched or already terminal.
                    }
                }
            }
        }

        newly_skipped
    }

    /// Mark every still-pending node as `Skipped` (run cancellation).
    ///
    /// In-flight nodes keep running; the run becomes terminal once they have
    /// all completed.
    pub fn mark_all_pending_skipped(&mut self) -> Vec<NodeId> {
        let mut newly_skipped = Vec::new();

        for id in self.graph.node_ids() {
            if let Some(info) = self.nodes.get_mut(id) {
                if info.state == NodeState::Pending {
                    info.state = NodeState::Skipped;
                    newly_skipped.push(info.name.clone());
                }
            }
        }

        if !newly_skipped.is_empty() {
            debug!(
                run_id = %self.run_id,
                count = newly_skipped.len(),
                "cancelled run; skipped all pending nodes"
            );
        }

        newly_skipped
    }

    /// Check if every node is in a terminal state.
    pub fn all_terminal(&self) -> bool {
        !self
            .nodes
            .values()
            .any(|info| matches!(info.state, NodeState::Pending | NodeState::Running))
    }
}
