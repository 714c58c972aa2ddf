// src/config/validate.rs

use crate::config::model::{EngineSettings, RawSettings};
use crate::errors::{DagrunError, Result};

impl TryFrom<RawSettings> for EngineSettings {
    type Error = DagrunError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        validate_raw_settings(&raw)?;
        Ok(EngineSettings::new_unchecked(raw.engine))
    }
}

fn validate_raw_settings(raw: &RawSettings) -> Result<()> {
    if raw.engine.max_parallel_nodes == 0 {
        return Err(DagrunError::Settings(
            "[engine].max_parallel_nodes must be >= 1 (got 0)".to_string(),
        ));
    }

    if raw.engine.event_queue_depth == 0 {
        return Err(DagrunError::Settings(
            "[engine].event_queue_depth must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}
