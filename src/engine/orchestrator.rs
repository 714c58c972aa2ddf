// src/engine/orchestrator.rs

//! The public orchestration surface.
//!
//! A transport layer (HTTP, CLI, tests) holds one [`Orchestrator`] and
//! translates caller requests into its methods. Submission errors surface
//! synchronously, before a run id is issued; everything after submission is
//! observed through status and log queries.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::config::EngineSettings;
use crate::dag::RunScheduler;
use crate::engine::core::RunCore;
use crate::engine::registry::{RunEntry, RunRegistry};
use crate::engine::runtime::RunDriver;
use crate::engine::{NodeId, RunEvent};
use crate::errors::{DagrunError, Result};
use crate::exec::{ExecutorRegistry, TaskLauncher};
use crate::graph::{Graph, validate_graph};
use crate::status::RunRecord;
use crate::store::ArtifactStore;
use crate::types::{NodeState, RunId};

/// Terminal outcome of a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: RunId,
    pub status: BTreeMap<NodeId, NodeState>,
    /// A run succeeded iff every node reached `success`.
    pub succeeded: bool,
}

/// Owns the executor registry and the run registry, and manages the
/// execution lifecycle of every submitted run.
///
/// Each run executes in its own spawned driver task; concurrent runs share
/// no mutable state beyond the registries, so one run's executor blocking
/// never stalls another run.
#[derive(Debug)]
pub struct Orchestrator {
    executors: Arc<ExecutorRegistry>,
    runs: Arc<RunRegistry>,
    settings: EngineSettings,
}

impl Orchestrator {
    pub fn new(executors: ExecutorRegistry, settings: EngineSettings) -> Self {
        Self::with_registry(Arc::new(executors), Arc::new(RunRegistry::new()), settings)
    }

    /// Construct with explicit (shared) registries.
    pub fn with_registry(
        executors: Arc<ExecutorRegistry>,
        runs: Arc<RunRegistry>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            executors,
            runs,
            settings,
        }
    }

    pub fn run_registry(&self) -> Arc<RunRegistry> {
        Arc::clone(&self.runs)
    }

    /// Submit a graph for execution.
    ///
    /// Validates structure ([`DagrunError::MalformedGraph`]) and acyclicity
    /// ([`DagrunError::CycleDetected`]) synchronously; on success allocates a
    /// run id, initializes every node to `pending`, and spawns the driver
    /// task. Execution proceeds in the background; poll [`Self::status`] or
    /// await [`Self::wait`].
    pub fn submit(&self, graph: Graph) -> Result<RunId> {
        validate_graph(&graph)?;

        let run_id = RunId::new();
        let scheduler = RunScheduler::new(&graph, run_id)?;

        let node_order: Vec<NodeId> = graph.node_ids().map(str::to_string).collect();
        let record = Arc::new(RunRecord::new(run_id, node_order));
        let store = Arc::new(ArtifactStore::new());

        let (event_tx, event_rx) = mpsc::channel::<RunEvent>(self.settings.event_queue_depth);

        let launcher = TaskLauncher::new(
            Arc::clone(&self.executors),
            Arc::clone(&store),
            Arc::clone(&record),
            event_tx.clone(),
            self.settings.max_parallel_nodes,
        );

        let core = RunCore::new(scheduler);
        let driver = RunDriver::new(core, event_rx, launcher, Arc::clone(&record));

        info!(run_id = %run_id, nodes = graph.nodes.len(), "submitting run");

        let driver_handle = tokio::spawn(async move {
            if let Err(err) = driver.run().await {
                error!(run_id = %run_id, error = %err, "run driver failed");
            }
        });

        let artifacts = self.settings.retain_artifacts.then(|| Arc::clone(&store));

        self.runs.insert(
            run_id,
            RunEntry {
                record,
                events: event_tx,
                driver: driver_handle,
                artifacts,
            },
        );

        Ok(run_id)
    }

    /// Per-node state mapping of a run.
    pub fn status(&self, run_id: &RunId) -> Result<BTreeMap<NodeId, NodeState>> {
        let record = self.record(run_id)?;
        Ok(record.status())
    }

    /// The captured log of one node.
    ///
    /// `LogNotFound` if the node never started (or is not part of the run).
    pub fn node_log(&self, run_id: &RunId, node: &str) -> Result<String> {
        let record = self.record(run_id)?;
        record.log_of(node).ok_or_else(|| DagrunError::LogNotFound {
            run: *run_id,
            node: node.to_string(),
        })
    }

    /// Every available per-node log of a run, concatenated in submission
    /// order, each section prefixed with its node id.
    pub fn run_log(&self, run_id: &RunId) -> Result<String> {
        let record = self.record(run_id)?;
        Ok(record.all_logs())
    }

    /// Request cancellation of a run.
    ///
    /// Not-yet-started nodes are skipped; in-flight nodes finish naturally.
    /// Cancelling a run that already reached a terminal state is a no-op.
    pub async fn cancel(&self, run_id: &RunId) -> Result<()> {
        let events = self
            .runs
            .events(run_id)
            .ok_or(DagrunError::RunNotFound(*run_id))?;

        // A send error means the driver already exited; nothing to cancel.
        let _ = events.send(RunEvent::CancelRequested).await;
        Ok(())
    }

    /// Wait until the run reaches a terminal state and summarize it.
    pub async fn wait(&self, run_id: &RunId) -> Result<RunSummary> {
        let record = self.record(run_id)?;
        record.wait_finished().await;
        Ok(RunSummary {
            run_id: *run_id,
            succeeded: record.all_succeeded(),
            status: record.status(),
        })
    }

    /// The retained artifact store of a run (only when the engine is
    /// configured with `retain_artifacts = true`).
    pub fn artifacts(&self, run_id: &RunId) -> Option<Arc<ArtifactStore>> {
        self.runs.artifacts(run_id)
    }

    fn record(&self, run_id: &RunId) -> Result<Arc<RunRecord>> {
        self.runs
            .record(run_id)
            .ok_or(DagrunError::RunNotFound(*run_id))
    }
}
