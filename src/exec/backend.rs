// src/exec/backend.rs

//! Pluggable node launcher abstraction.
//!
//! The run driver talks to a `NodeLauncher` instead of spawning executor
//! tasks itself. This makes it easy to swap in a fake launcher in tests while
//! keeping the production launch path in [`TaskLauncher`].
//!
//! - `TaskLauncher` is the default implementation: it resolves each node's
//!   executor from the registry and runs it in its own Tokio task, bounded by
//!   a per-run semaphore.
//! - Tests can provide their own `NodeLauncher` that, for example, records
//!   which nodes were dispatched and directly emits `NodeCompleted` events.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, warn};

use crate::dag::ScheduledNode;
use crate::engine::{NodeOutcome, RunEvent};
use crate::errors::Result;
use crate::exec::log_sink::LogSink;
use crate::exec::node_runner::run_node;
use crate::exec::registry::ExecutorRegistry;
use crate::status::RunRecord;
use crate::store::ArtifactStore;

/// Trait abstracting how ready nodes are executed.
///
/// Production code uses [`TaskLauncher`]; tests can provide their own
/// implementation that doesn't run real executors.
pub trait NodeLauncher: Send {
    /// Dispatch the given nodes for execution.
    ///
    /// The implementation is free to:
    /// - spawn executor tasks (production)
    /// - simulate completion and emit `RunEvent`s (tests)
    fn launch_ready_nodes(
        &mut self,
        nodes: Vec<ScheduledNode>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production launcher: one Tokio task per node execution.
///
/// Holds everything a node execution needs: the executor registry, the
/// run's artifact store and record, the event sender back to the driver, and
/// the semaphore bounding per-run parallelism.
pub struct TaskLauncher {
    registry: Arc<ExecutorRegistry>,
    store: Arc<ArtifactStore>,
    record: Arc<RunRecord>,
    events: mpsc::Sender<RunEvent>,
    permits: Arc<Semaphore>,
}

impl TaskLauncher {
    pub fn new(
        registry: Arc<ExecutorRegistry>,
        store: Arc<ArtifactStore>,
        record: Arc<RunRecord>,
        events: mpsc::Sender<RunEvent>,
        max_parallel_nodes: usize,
    ) -> Self {
        // A zero cap would deadlock every dispatch; settings validation
        // rejects it, but clamp anyway for direct constructions.
        let permits = Arc::new(Semaphore::new(max_parallel_nodes.max(1)));
        Self {
            registry,
            store,
            record,
            events,
            permits,
        }
    }
}

impl NodeLauncher for TaskLauncher {
    fn launch_ready_nodes(
        &mut self,
        nodes: Vec<ScheduledNode>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            for node in nodes {
                match self.registry.resolve(&node.name, &node.kind) {
                    Ok(executor) => {
                        debug!(
                            node = %node.name,
                            run_id = %node.run_id,
                            kind = %node.kind,
                            "spawning node execution"
                        );

                        let store = Arc::clone(&self.store);
                        let record = Arc::clone(&self.record);
                        let events = self.events.clone();
                        let permits = Arc::clone(&self.permits);

                        tokio::spawn(async move {
                            run_node(node, executor, store, record, events, permits).await;
                        });
                    }
                    Err(err) => {
                        // Unknown node type: fatal for this node, recorded in
                        // its log; the scheduler will skip its dependents.
                        warn!(
                            node = %node.name,
                            run_id = %node.run_id,
                            kind = %node.kind,
                            "no executor registered for node type"
                        );

                        let log = LogSink::new(Arc::clone(&self.record), node.name.clone());
                        log.append(&err.to_string());

                        self.events
                            .send(RunEvent::NodeCompleted {
                                node: node.name,
                                outcome: NodeOutcome::Failed,
                            })
                            .await
                            .map_err(anyhow::Error::from)?;
                    }
                }
            }
            Ok(())
        })
    }
}
