// src/dag/scheduler_step.rs

//! Step-by-step execution result types for the scheduler.

use crate::dag::node_info::ScheduledNode;
use crate::engine::NodeId;

/// Structured result of a single scheduler "step".
///
/// Tests that manually step the scheduler use this to assert exactly what
/// changed; the run driver uses it to decide what to dispatch and record.
#[derive(Debug, Clone)]
pub struct SchedulerStep {
    /// Nodes that became ready to run as a result of this step, in
    /// submission order. They have already transitioned to `Running`.
    pub newly_ready: Vec<ScheduledNode>,
    /// Nodes newly marked `Skipped` in this step (downstream of a failure,
    /// or still pending when the run was cancelled).
    pub newly_skipped: Vec<NodeId>,
    /// Whether this step brought the run to a terminal state.
    pub run_finished: bool,
}

impl SchedulerStep {
    pub fn empty(run_finished: bool) -> Self {
        Self {
            newly_ready: Vec::new(),
            newly_skipped: Vec::new(),
            run_finished,
        }
    }
}
