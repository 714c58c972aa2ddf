// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::core::{CoreCommand, RunCore};
use crate::engine::{NodeOutcome, RunEvent};
use crate::errors::Result;
use crate::exec::NodeLauncher;
use crate::status::RunRecord;
use crate::types::NodeState;

/// Drives one run in response to `RunEvent`s, and delegates actual node
/// execution to a `NodeLauncher`.
///
/// This is a pure IO shell around `RunCore`, which contains all the run
/// semantics. This struct handles async IO: reading events from the run's
/// channel, dispatching nodes to the launcher, and mirroring state
/// transitions into the shared [`RunRecord`] (one lock write per transition,
/// so status readers never observe a torn record).
pub struct RunDriver<L: NodeLauncher> {
    core: RunCore,
    event_rx: mpsc::Receiver<RunEvent>,
    launcher: L,
    record: Arc<RunRecord>,
}

impl<L: NodeLauncher> fmt::Debug for RunDriver<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunDriver")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<L: NodeLauncher> RunDriver<L> {
    pub fn new(
        core: RunCore,
        event_rx: mpsc::Receiver<RunEvent>,
        launcher: L,
        record: Arc<RunRecord>,
    ) -> Self {
        Self {
            core,
            event_rx,
            launcher,
            record,
        }
    }

    /// Main event loop for one run.
    ///
    /// - Dispatches the initial ready frontier.
    /// - Consumes `RunEvent`s from `event_rx`.
    /// - Feeds them into the pure core.
    /// - Executes the commands returned by the core (record transitions,
    ///   launch nodes, finish).
    ///
    /// The record is marked finished on every exit path, so `wait` callers
    /// are never left hanging.
    pub async fn run(mut self) -> Result<()> {
        let result = self.run_inner().await;
        self.record.mark_finished();
        result
    }

    async fn run_inner(&mut self) -> Result<()> {
        info!(run_id = %self.record.run_id(), "run driver started");

        let step = self.core.start();
        let mut keep_running = step.keep_running;
        for command in step.commands {
            self.execute_command(command).await?;
        }

        while keep_running {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!(
                        run_id = %self.record.run_id(),
                        "run event channel closed; exiting"
                    );
                    break;
                }
            };

            debug!(run_id = %self.record.run_id(), ?event, "driver received event");

            // Record the transition before the core reacts to it, so a
            // status reader can never see a node both unfinished and with
            // scheduled dependents.
            if let RunEvent::NodeCompleted { node, outcome } = &event {
                let state = match outcome {
                    NodeOutcome::Success => NodeState::Success,
                    NodeOutcome::Failed => NodeState::Failed,
                };
                self.record.set_state(node, state);
            }

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            keep_running = step.keep_running;
        }

        info!(run_id = %self.record.run_id(), "run driver exiting");
        Ok(())
    }

    /// Execute a single command from the core.
    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::DispatchNodes(nodes) => {
                for node in &nodes {
                    self.record.set_state(&node.name, NodeState::Running);
                }
                self.launch_ready(nodes).await?;
            }
            CoreCommand::MarkSkipped(nodes) => {
                for node in &nodes {
                    self.record.set_state(node, NodeState::Skipped);
                }
            }
            CoreCommand::FinishRun => {
                // The core also returns keep_running=false in this case; the
                // actual finish bookkeeping happens when the loop exits.
                info!(run_id = %self.record.run_id(), "core issued FinishRun command");
            }
        }
        Ok(())
    }

    async fn launch_ready(&mut self, nodes: Vec<crate::dag::ScheduledNode>) -> Result<()> {
        if nodes.is_empty() {
            return Ok(());
        }

        let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        debug!(run_id = %self.record.run_id(), ?names, "launching ready nodes");

        self.launcher.launch_ready_nodes(nodes).await
    }
}
