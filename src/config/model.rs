// src/config/model.rs

use serde::Deserialize;

/// Top-level settings as read from a TOML file.
///
/// ```toml
/// [engine]
/// max_parallel_nodes = 4
/// retain_artifacts = false
/// event_queue_depth = 64
/// ```
///
/// All sections and fields are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSettings {
    #[serde(default)]
    pub engine: EngineSection,
}

/// `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    /// Maximum number of nodes of one run executing at the same time.
    #[serde(default = "default_max_parallel_nodes")]
    pub max_parallel_nodes: usize,

    /// Keep a run's artifact store around after the run reaches a terminal
    /// state (for post-run inspection). By default the store is reclaimed.
    #[serde(default)]
    pub retain_artifacts: bool,

    /// Capacity of the per-run event channel between node executions and
    /// the run driver.
    #[serde(default = "default_event_queue_depth")]
    pub event_queue_depth: usize,
}

fn default_max_parallel_nodes() -> usize {
    4
}

fn default_event_queue_depth() -> usize {
    64
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            max_parallel_nodes: default_max_parallel_nodes(),
            retain_artifacts: false,
            event_queue_depth: default_event_queue_depth(),
        }
    }
}

/// Validated engine settings, as consumed by the orchestrator.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub max_parallel_nodes: usize,
    pub retain_artifacts: bool,
    pub event_queue_depth: usize,
}

impl EngineSettings {
    /// Used by `TryFrom<RawSettings>` after validation has passed.
    pub(crate) fn new_unchecked(section: EngineSection) -> Self {
        Self {
            max_parallel_nodes: section.max_parallel_nodes,
            retain_artifacts: section.retain_artifacts,
            event_queue_depth: section.event_queue_depth,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::new_unchecked(EngineSection::default())
    }
}
