// src/exec/registry.rs

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::StepError;
use crate::exec::executor::StepExecutor;

/// Fixed mapping from node `type` string to a step executor.
///
/// Populated once at process start and shared (read-only) by every run; it is
/// never mutated per run. A lookup miss at execution time fails the node (an
/// `UnknownNodeType` is recorded in its log), never silently skips it.
#[derive(Default)]
pub struct ExecutorRegistry {
    executors: HashMap<String, Arc<dyn StepExecutor>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an executor for a node type (builder style).
    ///
    /// Registering the same type twice replaces the earlier executor.
    pub fn with(mut self, kind: impl Into<String>, executor: Arc<dyn StepExecutor>) -> Self {
        self.executors.insert(kind.into(), executor);
        self
    }

    /// Look up the executor for a node type.
    pub fn lookup(&self, kind: &str) -> Option<Arc<dyn StepExecutor>> {
        self.executors.get(kind).cloned()
    }

    /// Resolve the executor for a node, reporting `UnknownNodeType` (naming
    /// the node and its type) on a miss.
    pub fn resolve(
        &self,
        node: &str,
        kind: &str,
    ) -> Result<Arc<dyn StepExecutor>, StepError> {
        self.lookup(kind).ok_or_else(|| StepError::UnknownNodeType {
            node: node.to_string(),
            kind: kind.to_string(),
        })
    }

    /// Registered type names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.executors.keys().map(|s| s.as_str()).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.executors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}

impl std::fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
