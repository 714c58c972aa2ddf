// src/steps/command.rs

//! Shell command step.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{Context, anyhow};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::errors::StepError;
use crate::exec::{LogSink, StepExecutor};
use crate::graph::Metadata;
use crate::store::ArtifactStore;

/// Runs the shell command named in the node's `cmd` metadata field.
///
/// Stdout and stderr are streamed line-by-line into the node log. A non-zero
/// exit status fails the node.
pub struct CommandStep;

impl StepExecutor for CommandStep {
    fn execute<'a>(
        &'a self,
        metadata: &'a Metadata,
        _store: &'a ArtifactStore,
        log: &'a LogSink,
    ) -> Pin<Box<dyn Future<Output = Result<(), StepError>> + Send + 'a>> {
        Box::pin(async move {
            let cmd_line = metadata
                .get("cmd")
                .and_then(|v| v.as_str())
                .ok_or_else(|| anyhow!("no 'cmd' provided in metadata"))?;

            log.append(&format!("running command: {cmd_line}"));

            // Build a shell command appropriate for the platform.
            let mut cmd = if cfg!(windows) {
                let mut c = Command::new("cmd");
                c.arg("/C").arg(cmd_line);
                c
            } else {
                let mut c = Command::new("sh");
                c.arg("-c").arg(cmd_line);
                c
            };

            cmd.stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            let mut child = cmd
                .spawn()
                .with_context(|| format!("spawning process for command '{cmd_line}'"))
                .map_err(StepError::Domain)?;

            // Drain both pipes into the log so buffers don't fill.
            let stdout_task = child.stdout.take().map(|stdout| {
                let log = log.clone();
                tokio::spawn(async move {
                    let mut lines = BufReader::new(stdout).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        log.append(&line);
                    }
                })
            });

            let stderr_task = child.stderr.take().map(|stderr| {
                let log = log.clone();
                tokio::spawn(async move {
                    let mut lines = BufReader::new(stderr).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        log.append(&format!("stderr: {line}"));
                    }
                })
            });

            let status = child
                .wait()
                .await
                .with_context(|| format!("waiting for command '{cmd_line}'"))
                .map_err(StepError::Domain)?;

            if let Some(task) = stdout_task {
                let _ = task.await;
            }
            if let Some(task) = stderr_task {
                let _ = task.await;
            }

            let code = status.code().unwrap_or(-1);
            log.append(&format!("command exited with code {code}"));

            if status.success() {
                Ok(())
            } else {
                Err(StepError::Domain(anyhow!(
                    "command '{cmd_line}' exited with code {code}"
                )))
            }
        })
    }
}
