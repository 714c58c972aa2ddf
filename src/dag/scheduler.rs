// src/dag/scheduler.rs

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use crate::dag::graph::DagGraph;
use crate::dag::node_info::NodeInfo;
use crate::dag::scheduler_step::SchedulerStep;
use crate::dag::state_manager::StateManager;
use crate::engine::{NodeId, NodeOutcome};
use crate::errors::Result;
use crate::graph::Graph;
use crate::types::{NodeState, RunId};

/// Per-run scheduler: the immutable DAG plus mutable per-node state.
///
/// It is responsible for:
/// - computing the initial ready frontier when the run starts
/// - deciding which nodes become ready when a node completes
/// - skipping the downstream cone of a failed node
/// - detecting when the run has reached a terminal state
///
/// One scheduler instance belongs to exactly one run; concurrent runs each
/// own their own instance and share nothing.
#[derive(Debug)]
pub struct RunScheduler {
    graph: DagGraph,
    nodes: HashMap<NodeId, NodeInfo>,
    run_id: RunId,
}

impl RunScheduler {
    /// Construct a scheduler for one run of a structurally-validated graph.
    ///
    /// Computes a topological order up front, so a cyclic graph is rejected
    /// here with `CycleDetected` before any node state exists.
    pub fn new(spec: &Graph, run_id: RunId) -> Result<Self> {
        let graph = DagGraph::from_graph(spec);

        // The order itself is not kept; execution follows the ready frontier.
        let _ = graph.topo_order()?;

        let mut nodes = HashMap::new();
        for node in &spec.nodes {
            let deps = graph.dependencies_of(&node.id);
            nodes.insert(node.id.clone(), NodeInfo::from_node(node, deps));
        }

        Ok(Self {
            graph,
            nodes,
            run_id,
        })
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Read-only view of the given node's state.
    pub fn state_of(&self, node: &str) -> Option<NodeState> {
        self.nodes.get(node).map(|info| info.state)
    }

    /// Snapshot of every node's state.
    pub fn states(&self) -> BTreeMap<NodeId, NodeState> {
        self.nodes
            .values()
            .map(|info| (info.name.clone(), info.state))
            .collect()
    }

    /// Node ids in submission order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.node_ids()
    }

    /// Whether no node is `Pending` or `Running`.
    pub fn is_terminal(&self) -> bool {
        !self
            .nodes
            .values()
            .any(|info| matches!(info.state, NodeState::Pending | NodeState::Running))
    }

    /// Kick off the run: every node starts `Pending`, and the zero-dependency
    /// frontier transitions to `Running`.
    pub fn start(&mut self) -> SchedulerStep {
        debug!(run_id = %self.run_id, nodes = self.graph.len(), "starting run");

        let mut manager = StateManager::new(&self.graph, &mut self.nodes, self.run_id);
        let newly_ready = manager.collect_new_ready();
        let run_finished = manager.all_terminal();

        SchedulerStep {
            newly_ready,
            newly_skipped: Vec::new(),
            run_finished,
        }
    }

    /// Handle completion of a node with a concrete outcome.
    ///
    /// On success, dependents whose dependencies are now all satisfied become
    /// ready. On failure, the downstream cone is skipped; nodes outside the
    /// cone are unaffected and independent branches keep executing.
    pub fn complete(&mut self, node: &str, outcome: NodeOutcome) -> SchedulerStep {
        match self.state_of(node) {
            None => {
                warn!(node = %node, "completion for unknown node; ignoring");
                return SchedulerStep::empty(self.is_terminal());
            }
            Some(NodeState::Running) => {}
            Some(state) => {
                warn!(
                    node = %node,
                    state = %state,
                    "completion for a node that is not running; ignoring"
                );
                return SchedulerStep::empty(self.is_terminal());
            }
        }

        let mut newly_ready = Vec::new();
        let mut newly_skipped = Vec::new();

        match outcome {
            NodeOutcome::Success => {
                if let Some(info) = self.nodes.get_mut(node) {
                    info.state = NodeState::Success;
                }
                debug!(node = %node, run_id = %self.run_id, "node completed successfully");

                let mut manager =
                    StateManager::new(&self.graph, &mut self.nodes, self.run_id);
                newly_ready = manager.collect_new_ready();
            }
            NodeOutcome::Failed => {
                if let Some(info) = self.nodes.get_mut(node) {
                    info.state = NodeState::Failed;
                }
                warn!(
                    node = %node,
                    run_id = %self.run_id,
                    "node failed; skipping downstream dependents"
                );

                let mut manager =
                    StateManager::new(&self.graph, &mut self.nodes, self.run_id);
                newly_skipped = manager.mark_descendants_skipped(node);
            }
        }

        let run_finished = self.maybe_finish();

        SchedulerStep {
            newly_ready,
            newly_skipped,
            run_finished,
        }
    }

    /// Cancel the run: stop scheduling new nodes and skip everything that has
    /// not started. In-flight nodes are left to finish naturally.
    pub fn cancel(&mut self) -> SchedulerStep {
        let mut manager = StateManager::new(&self.graph, &mut self.nodes, self.run_id);
        let newly_skipped = manager.mark_all_pending_skipped();
        let run_finished = manager.all_terminal();

        SchedulerStep {
            newly_ready: Vec::new(),
            newly_skipped,
            run_finished,
        }
    }

    fn maybe_finish(&self) -> bool {
        let terminal = self.is_terminal();
        if terminal {
            info!(run_id = %self.run_id, "all nodes terminal; run finished");
        }
        terminal
    }
}
