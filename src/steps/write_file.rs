// src/steps/write_file.rs

//! File export step.

use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, anyhow};

use crate::errors::StepError;
use crate::exec::{LogSink, StepExecutor};
use crate::graph::Metadata;
use crate::store::{ArtifactStore, PRIMARY_ARTIFACT};

/// Writes an artifact from the store to the file named in the node's `path`
/// metadata field.
///
/// The source key defaults to `primary-artifact` and can be overridden with
/// a `key` metadata field. A missing artifact is fatal for this step: an
/// upstream node must have published the data first.
pub struct WriteFileStep;

impl StepExecutor for WriteFileStep {
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

            let contents = store.require_as::<Vec<u8>>(key, log.node())?;

            log.append(&format!(
                "writing {} bytes from key '{key}' to: {path}",
                contents.len()
            ));

            tokio::fs::write(path, contents.as_slice())
                .await
                .with_context(|| format!("writing file '{path}'"))
                .map_err(StepError::Domain)?;

            log.append("file saved");
            Ok(())
        })
    }
}
