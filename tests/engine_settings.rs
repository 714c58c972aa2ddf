// tests/engine_settings.rs

//! Settings loading and validation.

use std::error::Error;
use std::io::Write;

use dagrun::config::{EngineSettings, RawSettings, load_and_validate};
use dagrun::errors::DagrunError;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn defaults_are_sane() {
    let settings = EngineSettings::default();
    assert_eq!(settings.max_parallel_nodes, 4);
    assert_eq!(settings.event_queue_depth, 64);
    assert!(!settings.retain_artifacts);
}

#[test]
fn empty_file_yields_defaults() -> TestResult {
    let raw: RawSettings = toml::from_str("")?;
    let settings = EngineSettings::try_from(raw)?;
    assert_eq!(settings.max_parallel_nodes, 4);
    Ok(())
}

#[test]
fn file_overrides_are_applied() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(
        file,
        "[engine]\nmax_parallel_nodes = 2\nretain_artifacts = true\nevent_queue_depth = 8"
    )?;

    let settings = load_and_validate(file.path())?;
    assert_eq!(settings.max_parallel_nodes, 2);
    assert_eq!(settings.event_queue_depth, 8);
    assert!(settings.retain_artifacts);

    Ok(())
}

#[test]
fn zero_parallelism_is_rejected() -> TestResult {
    let raw: RawSettings = toml::from_str("[engine]\nmax_parallel_nodes = 0")?;
    let err = EngineSettings::try_from(raw).unwrap_err();
    assert!(matches!(err, DagrunError::Settings(_)));
    Ok(())
}

#[test]
fn zero_queue_depth_is_rejected() -> TestResult {
    let raw: RawSettings = toml::from_str("[engine]\nevent_queue_depth = 0")?;
    let err = EngineSettings::try_from(raw).unwrap_err();
    assert!(matches!(err, DagrunError::Settings(_)));
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_and_validate("definitely-not-here/Dagrun.toml").unwrap_err();
    assert!(matches!(err, DagrunError::Io(_)));
}
