// src/exec/node_runner.rs

//! Individual node execution.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::dag::ScheduledNode;
use crate::engine::{NodeOutcome, RunEvent};
use crate::exec::executor::StepExecutor;
use crate::exec::log_sink::LogSink;
use crate::status::RunRecord;
use crate::store::ArtifactStore;

/// Run a single node to completion and report the outcome to the driver.
///
/// Executor errors never escape: a failure is appended to the node's log and
/// converted into a `NodeCompleted(Failed)` event. The semaphore bounds how
/// many nodes of one run execute at the same time.
pub async fn run_node(
    node: ScheduledNode,
    executor: Arc<dyn StepExecutor>,
    store: Arc<ArtifactStore>,
    record: Arc<RunRecord>,
    events: mpsc::Sender<RunEvent>,
    permits: Arc<Semaphore>,
) {
    let _permit = match Arc::clone(&permits).acquire_owned().await {
        Ok(permit) => permit,
        // The semaphore is never closed while a run is live; if it is, the
        // run is being torn down and there is nothing left to report to.
        Err(_) => return,
    };

    info!(
        node = %node.name,
        run_id = %node.run_id,
        kind = %node.kind,
        "starting node execution"
    );

    let log = LogSink::new(Arc::clone(&record), node.name.clone());

    let outcome = match executor.execute(&node.metadata, &store, &log).await {
        Ok(()) => {
            info!(node = %node.name, run_id = %node.run_id, "node execution succeeded");
            NodeOutcome::Success
        }
        Err(err) => {
            warn!(
                node = %node.name,
                run_id = %node.run_id,
                error = %err,
                "node execution failed"
            );
            log.append(&format!("step failed: {err}"));
            NodeOutcome::Failed
        }
    };

    if events
        .send(RunEvent::NodeCompleted {
            node: node.name.clone(),
            outcome,
        })
        .await
        .is_err()
    {
        debug!(
            node = %node.name,
            "run event channel closed before completion could be reported"
        );
    }
}
