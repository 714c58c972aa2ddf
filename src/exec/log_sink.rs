// src/exec/log_sink.rs

use std::sync::Arc;

use crate::status::RunRecord;

/// Append-only handle to one node's log.
///
/// Created when the node starts executing (which also creates the log entry,
/// so a `running` node's log is already queryable) and handed to the node's
/// executor for the duration of its execution window. Writes go straight
/// through to the run record; each appended chunk is terminated with a
/// newline if it lacks one.
#[derive(Clone)]
pub struct LogSink {
    record: Arc<RunRecord>,
    node: String,
}

impl LogSink {
    pub fn new(record: Arc<RunRecord>, node: String) -> Self {
        record.open_log(&node);
        Self { record, node }
    }

    /// The id of the node this sink is bound to.
    pub fn node(&self) -> &str {
        &self.node
    }

    /// Append a line of text to the node's log.
    pub fn append(&self, line: &str) {
        self.record.append_log(&self.node, line);
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink").field("node", &self.node).finish()
    }
}
