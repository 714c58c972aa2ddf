// src/status.rs

//! Per-run status and log record.
//!
//! One `RunRecord` exists per run, held by the run registry and shared with
//! the run driver. The driver is the sole writer of node states; log text is
//! appended through [`crate::exec::LogSink`] while a node executes. Callers
//! only ever read, and every state transition happens under one lock write,
//! so a reader always observes a complete, well-formed snapshot.
//!
//! Status and logs outlive the run's artifact store: they stay queryable
//! after the run reaches a terminal state.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::time::Instant;

use tokio::sync::watch;

use crate::engine::NodeId;
use crate::types::{NodeState, RunId};

/// Queryable record of one run: per-node state and captured log text.
#[derive(Debug)]
pub struct RunRecord {
    run_id: RunId,
    created_at: Instant,
    /// Node ids in submission order; fixes iteration order for full-run logs.
    node_order: Vec<NodeId>,
    status: RwLock<BTreeMap<NodeId, NodeState>>,
    /// A node has an entry here from the moment it starts running.
    logs: RwLock<BTreeMap<NodeId, String>>,
    finished_tx: watch::Sender<bool>,
}

impl RunRecord {
    /// Create a record with every node `Pending`.
    pub fn new(run_id: RunId, node_order: Vec<NodeId>) -> Self {
        let status = node_order
            .iter()
            .map(|id| (id.clone(), NodeState::Pending))
            .collect();
        let (finished_tx, _) = watch::channel(false);

        Self {
            run_id,
            created_at: Instant::now(),
            node_order,
            status: RwLock::new(status),
            logs: RwLock::new(BTreeMap::new()),
            finished_tx,
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Node ids in submission order.
    pub fn node_order(&self) -> &[NodeId] {
        &self.node_order
    }

    /// Record a single node transition.
    pub fn set_state(&self, node: &str, state: NodeState) {
        let mut status = self.status.write().expect("status lock poisoned");
        if let Some(slot) = status.get_mut(node) {
            *slot = state;
        }
    }

    /// Snapshot of the full status mapping.
    pub fn status(&self) -> BTreeMap<NodeId, NodeState> {
        self.status.read().expect("status lock poisoned").clone()
    }

    pub fn state_of(&self, node: &str) -> Option<NodeState> {
        self.status
            .read()
            .expect("status lock poisoned")
            .get(node)
            .copied()
    }

    /// Whether every node reached `Success`.
    pub fn all_succeeded(&self) -> bool {
        self.status
            .read()
            .expect("status lock poisoned")
            .values()
            .all(|s| *s == NodeState::Success)
    }

    /// Create the (empty) log entry for a node that is starting.
    pub fn open_log(&self, node: &str) {
        let mut logs = self.logs.write().expect("log lock poisoned");
        logs.entry(node.to_string()).or_default();
    }

    /// Append a line of text to a node's log.
    pub fn append_log(&self, node: &str, line: &str) {
        let mut logs = self.logs.write().expect("log lock poisoned");
        let entry = logs.entry(node.to_string()).or_default();
        entry.push_str(line);
        if !line.ends_with('\n') {
            entry.push('\n');
        }
    }

    /// The captured log of one node, or `None` if the node never started.
    pub fn log_of(&self, node: &str) -> Option<String> {
        self.logs
            .read()
            .expect("log lock poisoned")
            .get(node)
            .cloned()
    }

    /// Every available per-node log, concatenated in submission order with a
    /// node-id header per section.
    pub fn all_logs(&self) -> String {
        let logs = self.logs.read().expect("log lock poisoned");
        let mut out = String::new();

        for node in &self.node_order {
            if let Some(text) = logs.get(node) {
                out.push_str(&format!("--- {node} ---\n"));
                out.push_str(text);
                if !text.is_empty() && !text.ends_with('\n') {
                    out.push('\n');
                }
            }
        }

        out
    }

    /// Mark the run terminal, waking all `wait_finished` callers.
    pub fn mark_finished(&self) {
        let _ = self.finished_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        *self.finished_tx.borrow()
    }

    /// Wait until the run reaches a terminal state.
    pub async fn wait_finished(&self) {
        let mut rx = self.finished_tx.subscribe();
        // borrow() before changed() covers the already-finished case.
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}
