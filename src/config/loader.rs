// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{EngineSettings, RawSettings};
use crate::errors::Result;

/// Load settings from a given path and return the raw `RawSettings`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSettings> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawSettings = toml::from_str(&contents)?;
    Ok(raw)
}

/// Load settings from a path and run validation.
///
/// This is the recommended entry point for the rest of the application.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<EngineSettings> {
    let raw = load_from_path(&path)?;
    let settings = EngineSettings::try_from(raw)?;
    Ok(settings)
}

/// Helper to resolve the default settings path.
///
/// Currently this just returns `Dagrun.toml` in the current working
/// directory.
pub fn default_settings_path() -> PathBuf {
    PathBuf::from("Dagrun.toml")
}
