// src/graph/mod.rs

//! Submitted graph model.
//!
//! - [`model`] holds the wire-level `Graph` / `Node` / `Edge` types. These are
//!   dumb data holders: anything deserializable is representable.
//! - [`validate`] performs structural validation (edge endpoints, duplicate
//!   ids, self-loops). Acyclicity is checked later, at scheduling time.
//! - [`loader`] reads a graph from a JSON file (used by the CLI).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::load_from_path;
pub use model::{Edge, Graph, Metadata, Node};
pub use validate::validate_graph;
