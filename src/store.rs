// src/store.rs

//! Run-scoped artifact store.
//!
//! One store exists per run and is shared by every executor in that run; it
//! is never shared across runs. A node that loads external data typically
//! publishes it under [`PRIMARY_ARTIFACT`]; downstream nodes read (and may
//! overwrite) that key. Branching graphs use independent keys, so sibling
//! branches cannot clobber each other.
//!
//! Artifacts are opaque in-memory values (`Arc<dyn Any + Send + Sync>`); the
//! engine never inspects them. All access goes through one coarse lock, which
//! provides the happens-before edge the concurrency model requires for
//! parallel branches.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::errors::StepError;

/// Conventional key for the main artifact of a linear pipeline.
pub const PRIMARY_ARTIFACT: &str = "primary-artifact";

/// An opaque artifact value.
pub type Artifact = Arc<dyn Any + Send + Sync>;

/// Mutable key -> value cache scoped to one run.
#[derive(Default)]
pub struct ArtifactStore {
    slots: Mutex<HashMap<String, Artifact>>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an artifact under `key`, replacing any previous value.
    pub fn insert(&self, key: impl Into<String>, value: Artifact) {
        let mut slots = self.slots.lock().expect("artifact store lock poisoned");
        slots.insert(key.into(), value);
    }

    /// Convenience for publishing a concrete value.
    pub fn insert_value<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.insert(key, Arc::new(value));
    }

    /// Read the artifact under `key`, if present.
    pub fn get(&self, key: &str) -> Option<Artifact> {
        let slots = self.slots.lock().expect("artifact store lock poisoned");
        slots.get(key).cloned()
    }

    /// Read the artifact under `key`, reporting `MissingArtifact` (naming the
    /// key and the requesting node) if absent.
    ///
    /// The requesting executor decides whether that error is fatal.
    pub fn require(&self, key: &str, node: &str) -> Result<Artifact, StepError> {
        self.get(key).ok_or_else(|| StepError::MissingArtifact {
            key: key.to_string(),
            node: node.to_string(),
        })
    }

    /// Typed read: `require` plus a downcast to `T`.
    ///
    /// A type mismatch is reported as `MissingArtifact` as well; from the
    /// requesting node's point of view, the artifact it needs is not there.
    pub fn require_as<T: Any + Send + Sync>(
        &self,
        key: &str,
        node: &str,
    ) -> Result<Arc<T>, StepError> {
        self.require(key, node)?
            .downcast::<T>()
            .map_err(|_| StepError::MissingArtifact {
                key: key.to_string(),
                node: node.to_string(),
            })
    }

    /// Currently-present keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let slots = self.slots.lock().expect("artifact store lock poisoned");
        let mut keys: Vec<String> = slots.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.slots.lock().expect("artifact store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("keys", &self.keys())
            .finish()
    }
}
