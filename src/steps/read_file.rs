// src/steps/read_file.rs

//! File ingestion step.

use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, anyhow};

use crate::errors::StepError;
use crate::exec::{LogSink, StepExecutor};
use crate::graph::Metadata;
use crate::store::{ArtifactStore, PRIMARY_ARTIFACT};

/// Loads the file named in the node's `path` metadata field and publishes
/// its contents in the artifact store.
///
/// The target key defaults to `primary-artifact` and can be overridden with
/// a `key` metadata field, so branching graphs can ingest into independent
/// slots. The artifact value is the raw file contents (`Vec<u8>`).
pub struct ReadFileStep;

impl StepExecutor for ReadFileStep {
    fn execute<'a>(
        &'a self,
        metadata: &'a Metadata,
        store: &'a ArtifactStore,
        log: &'a LogSink,
    ) -> Pin<Box<dyn Future<Output = Result<(), StepError>> + Send + 'a>> {
        Box::pin(async move {
            let path = metadata
                .get("path")
                .and_then(|v| v.as_str())
                .ok_or_else(|| anyhow!("no 'path' provided in metadata"))?;

            let key = metadata
                .get("key")
                .and_then(|v| v.as_str())
                .unwrap_or(PRIMARY_ARTIFACT);

            log.append(&format!("loading file from: {path}"));

            let contents = tokio::fs::read(path)
                .await
                .with_context(|| format!("reading file '{path}'"))
                .map_err(StepError::Domain)?;

            log.append(&format!(
                "loaded {} bytes; publishing under key '{key}'",
                contents.len()
            ));

            store.insert_value(key, contents);
            Ok(())
        })
    }
}
