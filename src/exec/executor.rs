// src/exec/executor.rs

//! The step executor collaborator trait.

use std::future::Future;
use std::pin::Pin;

use crate::errors::StepError;
use crate::exec::log_sink::LogSink;
use crate::graph::Metadata;
use crate::store::ArtifactStore;

/// A pluggable collaborator that performs one node's domain work.
///
/// Executors receive the node's opaque metadata, the run's shared artifact
/// store, and a log sink bound to the executing node. They own all
/// domain-specific I/O; the engine only cares whether they return `Ok` or an
/// error.
///
/// Implementations must be safe to share: one executor instance serves every
/// node of its type across all runs, possibly concurrently.
pub trait StepExecutor: Send + Sync {
    /// Perform the node's work.
    ///
    /// Returning `Err` fails the node; its downstream dependents will be
    /// skipped. The error is recorded verbatim in the node's log.
    fn execute<'a>(
        &'a self,
        metadata: &'a Metadata,
        store: &'a ArtifactStore,
        log: &'a LogSink,
    ) -> Pin<Box<dyn Future<Output = Result<(), StepError>> + Send + 'a>>;
}

impl std::fmt::Debug for dyn StepExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StepExecutor")
    }
}
