// src/steps/mod.rs

//! Built-in step executors.
//!
//! These cover the generic ends of a processing pipeline so that the CLI is
//! usable out of the box; anything domain-specific belongs in embedder
//! executors.
//!
//! - [`command`]: run a shell command, streaming its output into the node
//!   log.
//! - [`read_file`]: load a file into the artifact store.
//! - [`write_file`]: write an artifact from the store to a file.

pub mod command;
pub mod read_file;
pub mod write_file;

pub use command::CommandStep;
pub use read_file::ReadFileStep;
pub use write_file::WriteFileStep;

use crate::exec::ExecutorRegistry;
use std::sync::Arc;

/// Registry with every built-in step registered under its conventional type
/// name (`command`, `read-file`, `write-file`).
pub fn builtin_registry() -> ExecutorRegistry {
    ExecutorRegistry::new()
        .with("command", Arc::new(CommandStep))
        .with("read-file", Arc::new(ReadFileStep))
        .with("write-file", Arc::new(WriteFileStep))
}
