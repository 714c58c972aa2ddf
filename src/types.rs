use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of one run.
///
/// Allocated by the orchestrator when a graph is submitted; callers treat it
/// as a token for status/log queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        RunId(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RunId(Uuid::parse_str(s)?))
    }
}

/// Public, read-only view of a node's execution state within a run.
///
/// Written exclusively by the run driver; callers only ever observe it
/// through status queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    /// Waiting on dependencies (or not yet dispatched).
    Pending,
    /// Dispatched to its executor and currently executing.
    Running,
    /// Executor finished without error.
    Success,
    /// Executor reported a failure, or the node's type had no executor.
    Failed,
    /// Never executed because an upstream node failed or the run was
    /// cancelled before it started.
    Skipped,
}

impl NodeState {
    /// Whether this state is terminal for the node.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            NodeState::Success | NodeState::Failed | NodeState::Skipped
        )
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeState::Pending => "pending",
            NodeState::Running => "running",
            NodeState::Success => "success",
            NodeState::Failed => "failed",
            NodeState::Skipped => "skipped",
        };
        f.write_str(s)
    }
}
