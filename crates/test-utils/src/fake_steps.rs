//! Fake step executors for tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use tokio::sync::{Semaphore, mpsc};

use dagrun::errors::StepError;
use dagrun::exec::{ExecutorRegistry, LogSink, StepExecutor};
use dagrun::graph::Metadata;
use dagrun::store::ArtifactStore;

type StepFuture<'a> = Pin<Box<dyn Future<Output = Result<(), StepError>> + Send + 'a>>;

/// Succeeds immediately, writing one line to the node log.
pub struct NoopStep;

impl StepExecutor for NoopStep {
    fn execute<'a>(
        &'a self,
        _metadata: &'a Metadata,
        _store: &'a ArtifactStore,
        log: &'a LogSink,
    ) -> StepFuture<'a> {
        Box::pin(async move {
            log.append("noop step done");
            Ok(())
        })
    }
}

/// Always fails with a domain error.
pub struct FailStep;

impl StepExecutor for FailStep {
    fn execute<'a>(
        &'a self,
        _metadata: &'a Metadata,
        _store: &'a ArtifactStore,
        log: &'a LogSink,
    ) -> StepFuture<'a> {
        Box::pin(async move {
            log.append("about to fail");
            Err(StepError::Domain(anyhow!("fake step failure")))
        })
    }
}

/// Records the id of every node it executes, then succeeds.
pub struct RecordingStep {
    executed: Arc<Mutex<Vec<String>>>,
}

impl RecordingStep {
    pub fn new(executed: Arc<Mutex<Vec<String>>>) -> Self {
        Self { executed }
    }
}

impl StepExecutor for RecordingStep {
    fn execute<'a>(
        &'a self,
        _metadata: &'a Metadata,
        _store: &'a ArtifactStore,
        log: &'a LogSink,
    ) -> StepFuture<'a> {
        Box::pin(async move {
            let mut guard = self.executed.lock().unwrap();
            guard.push(log.node().to_string());
            Ok(())
        })
    }
}

/// Publishes a fixed `String` artifact under `key`.
pub struct PutArtifactStep {
    key: String,
    value: String,
}

impl PutArtifactStep {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl StepExecutor for PutArtifactStep {
    fn execute<'a>(
        &'a self,
        _metadata: &'a Metadata,
        store: &'a ArtifactStore,
        log: &'a LogSink,
    ) -> StepFuture<'a> {
        Box::pin(async move {
            store.insert_value(self.key.clone(), self.value.clone());
            log.append(&format!("published '{}'", self.key));
            Ok(())
        })
    }
}

/// Requires a `String` artifact under `key` and records the value it saw.
///
/// Fails with `MissingArtifact` if the artifact is absent.
pub struct ReadArtifactStep {
    key: String,
    seen: Arc<Mutex<Vec<String>>>,
}

impl ReadArtifactStep {
    pub fn new(key: &str, seen: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            key: key.to_string(),
            seen,
        }
    }
}

impl StepExecutor for ReadArtifactStep {
    fn execute<'a>(
        &'a self,
        _metadata: &'a Metadata,
        store: &'a ArtifactStore,
        log: &'a LogSink,
    ) -> StepFuture<'a> {
        Box::pin(async move {
            let value = store.require_as::<String>(&self.key, log.node())?;
            self.seen.lock().unwrap().push((*value).clone());
            Ok(())
        })
    }
}

/// Announces when it starts, then blocks until the gate releases a permit.
///
/// Lets tests hold a node in the `running` state at a deterministic point
/// (e.g. to exercise cancellation).
pub struct GateStep {
    started: mpsc::UnboundedSender<String>,
    gate: Arc<Semaphore>,
}

impl GateStep {
    pub fn new(started: mpsc::UnboundedSender<String>, gate: Arc<Semaphore>) -> Self {
        Self { started, gate }
    }
}

impl StepExecutor for GateStep {
    fn execute<'a>(
        &'a self,
        _metadata: &'a Metadata,
        _store: &'a ArtifactStore,
        log: &'a LogSink,
    ) -> StepFuture<'a> {
        Box::pin(async move {
            let _ = self.started.send(log.node().to_string());
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|_| StepError::Domain(anyhow!("gate closed")))?;
            permit.forget();
            log.append("gate released");
            Ok(())
        })
    }
}

/// Registry with `noop` and `fail` step types, enough for most tests.
pub fn test_registry() -> ExecutorRegistry {
    ExecutorRegistry::new()
        .with("noop", Arc::new(NoopStep))
        .with("fail", Arc::new(FailStep))
}
