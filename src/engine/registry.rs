// src/engine/registry.rs

//! Run registry: the explicit, injectable mapping from run id to run state.
//!
//! One registry instance belongs to one orchestrator; creating several
//! orchestrators (e.g. in tests) never shares ambient state. The registry
//! must tolerate concurrent inserts (new runs) and concurrent reads (status
//! polling) while runs are executing, hence the `RwLock`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::engine::RunEvent;
use crate::status::RunRecord;
use crate::store::ArtifactStore;
use crate::types::RunId;

/// Everything the registry tracks about one run.
#[derive(Debug)]
pub struct RunEntry {
    /// Queryable status/log record; outlives the run's execution.
    pub record: Arc<RunRecord>,
    /// Event sender into the run's driver loop (used for cancellation).
    /// Sends fail harmlessly once the driver has exited.
    pub events: mpsc::Sender<RunEvent>,
    /// The driver task. Tracked so background execution is never an
    /// untracked fire-and-forget callback.
    pub driver: JoinHandle<()>,
    /// The run's artifact store, retained only when configured; otherwise
    /// the store is reclaimed when the driver drops it at terminal state.
    pub artifacts: Option<Arc<ArtifactStore>>,
}

/// Mapping from run id to run state, safe for concurrent insert and read.
#[derive(Debug, Default)]
pub struct RunRegistry {
    runs: RwLock<HashMap<RunId, RunEntry>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, run_id: RunId, entry: RunEntry) {
        let mut runs = self.runs.write().expect("run registry lock poisoned");
        runs.insert(run_id, entry);
    }

    pub fn contains(&self, run_id: &RunId) -> bool {
        let runs = self.runs.read().expect("run registry lock poisoned");
        runs.contains_key(run_id)
    }

    /// The status/log record of a run, if known.
    pub fn record(&self, run_id: &RunId) -> Option<Arc<RunRecord>> {
        let runs = self.runs.read().expect("run registry lock poisoned");
        runs.get(run_id).map(|entry| Arc::clone(&entry.record))
    }

    /// The event sender into a run's driver, if known.
    pub fn events(&self, run_id: &RunId) -> Option<mpsc::Sender<RunEvent>> {
        let runs = self.runs.read().expect("run registry lock poisoned");
        runs.get(run_id).map(|entry| entry.events.clone())
    }

    /// The retained artifact store of a run, if configured and known.
    pub fn artifacts(&self, run_id: &RunId) -> Option<Arc<ArtifactStore>> {
        let runs = self.runs.read().expect("run registry lock poisoned");
        runs.get(run_id).and_then(|entry| entry.artifacts.clone())
    }

    /// Ids of every known run.
    pub fn run_ids(&self) -> Vec<RunId> {
        let runs = self.runs.read().expect("run registry lock poisoned");
        runs.keys().copied().collect()
    }

    /// Drop a run entirely (record, logs, retained artifacts). Aborts the
    /// driver if it is somehow still live.
    pub fn remove(&self, run_id: &RunId) -> bool {
        let mut runs = self.runs.write().expect("run registry lock poisoned");
        match runs.remove(run_id) {
            Some(entry) => {
                if !entry.driver.is_finished() {
                    entry.driver.abort();
                }
                true
            }
            None => false,
        }
    }
}
