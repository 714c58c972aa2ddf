// src/engine/core.rs

//! Pure core state machine for one run.
//!
//! This module contains a synchronous, deterministic "run core" that consumes
//! [`RunEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::RunDriver`) is responsible
//! for:
//! - reading events from the run's channel
//! - handing `ScheduledNode`s to the launcher
//! - recording state transitions in the run record
//!
//! The core is intended to be extensively unit tested without any Tokio,
//! channels, or executors.

use crate::dag::{RunScheduler, ScheduledNode};
use crate::engine::{NodeId, RunEvent};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Hand these nodes to the launcher (they are already marked `Running`
    /// in the scheduler; the shell mirrors that into the run record).
    DispatchNodes(Vec<ScheduledNode>),
    /// Record these nodes as `Skipped`.
    MarkSkipped(Vec<NodeId>),
    /// The run reached a terminal state.
    FinishRun,
}

/// Decision returned by the core after handling a single [`RunEvent`].
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the driver loop should keep running.
    pub keep_running: bool,
}

/// Pure core state for one run.
///
/// Owns the per-run scheduler and the cancellation flag. It has **no**
/// channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct RunCore {
    scheduler: RunScheduler,
    cancelled: bool,
}

impl RunCore {
    pub fn new(scheduler: RunScheduler) -> Self {
        Self {
            scheduler,
            cancelled: false,
        }
    }

    /// Expose whether the run is terminal (for tests).
    pub fn is_terminal(&self) -> bool {
        self.scheduler.is_terminal()
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Compute the initial frontier.
    ///
    /// A graph with nodes always has a non-empty frontier here (cyclic graphs
    /// were rejected when the scheduler was built), so a run can only be
    /// terminal at start if it somehow has zero nodes.
    pub fn start(&mut self) -> CoreStep {
        let step = self.scheduler.start();
        Self::from_scheduler_step(step.newly_ready, step.newly_skipped, step.run_finished)
    }

    /// Handle a single run event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RunEvent) -> CoreStep {
        match event {
            RunEvent::NodeCompleted { node, outcome } => {
                // After cancellation every pending node is already skipped,
                // so completions cannot surface new ready nodes; they only
                // drain the in-flight set until the run is terminal.
                let step = self.scheduler.complete(&node, outcome);
                Self::from_scheduler_step(step.newly_ready, step.newly_skipped, step.run_finished)
            }
            RunEvent::CancelRequested => {
                self.cancelled = true;
                let step = self.scheduler.cancel();
                Self::from_scheduler_step(Vec::new(), step.newly_skipped, step.run_finished)
            }
        }
    }

    fn from_scheduler_step(
        ready: Vec<ScheduledNode>,
        skipped: Vec<NodeId>,
        finished: bool,
    ) -> CoreStep {
        let mut commands = Vec::new();

        if !skipped.is_empty() {
            commands.push(CoreCommand::MarkSkipped(skipped));
        }
        if !ready.is_empty() {
            commands.push(CoreCommand::DispatchNodes(ready));
        }
        if finished {
            commands.push(CoreCommand::FinishRun);
        }

        CoreStep {
            commands,
            keep_running: !finished,
        }
    }
}
