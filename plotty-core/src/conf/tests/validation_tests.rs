use crate::conf::{ConfigError, PlottyConfig, Severity, validate_config};
use std::fs;
use tempfile::tempdir;

fn config_in(dir: &std::path::Path) -> PlottyConfig {
    let mut config = PlottyConfig::default();
    config.resolve_paths(dir);
    config
}

#[test]
fn default_config_with_a_log_dir_is_clean() {
    // Arrange
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("logs")).unwrap();

    // Act
    let report = validate_config(&config_in(dir.path()));

    // Assert
    assert!(!report.has_violations());
}

#[test]
fn missing_log_dir_is_only_a_warning() {
    let dir = tempdir().unwrap();

    let report = validate_config(&config_in(dir.path()));

    assert!(!report.has_errors());
    assert_eq!(report.warnings[0].field, "log_dir");
    assert_eq!(report.warnings[0].severity, Severity::Warning);
}

#[test]
fn confidence_level_must_be_a_fraction() {
    // Arrange
    let dir = tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.confidence_level = 95.0;
    config.plotter.executable = " ".to_string();

    // Act
    let report = validate_config(&config);

    // Assert
    let fields: Vec<&str> = report.errors.iter().map(|e| e.field).collect();
    assert_eq!(fields, vec!["confidence_level", "plotter.executable"]);
}

#[test]
fn load_fails_on_validation_errors() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("plotty.hcl"), "confidence_level = 0").unwrap();

    let err = crate::conf::load_config(dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Validation { ref report } if report.errors.len() == 1));
}
