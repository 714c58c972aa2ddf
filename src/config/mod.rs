// src/config/mod.rs

//! Engine settings.
//!
//! Settings come from an optional `Dagrun.toml` file; every field has a
//! default, so embedders can also just use [`EngineSettings::default`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_settings_path, load_and_validate, load_from_path};
pub use model::{EngineSettings, RawSettings};
