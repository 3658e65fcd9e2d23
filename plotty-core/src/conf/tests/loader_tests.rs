use crate::conf::{CONFIG_FILE, ConfigError, load_config};
use std::fs;
use tempfile::tempdir;

#[test]
fn defaults_apply_to_an_empty_file() {
    // Arrange
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("logs")).unwrap();
    fs::write(dir.path().join(CONFIG_FILE), "").unwrap();

    // Act
    let config = load_config(dir.path()).unwrap();

    // Assert
    assert_eq!(config.confidence_level, 0.95);
    assert_eq!(config.plotter.executable, "gnuplot");
    assert!(!config.tabulate.background);
    assert_eq!(config.cache_dir, dir.path().join("cache"));
}

#[test]
fn relative_paths_resolve_against_the_config_dir() {
    // Arrange
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("styles.json"), "{}").unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE),
        r#"
        confidence_level = 0.9
        log_dir = "/var/plotty/logs"
        styles = "styles.json"

        plotter {
          executable = "/usr/bin/gnuplot"
          args = ["-persist"]
        }

        tabulate {
          background = true
        }
        "#,
    )
    .unwrap();

    // Act
    let config = load_config(dir.path()).unwrap();

    // Assert
    assert_eq!(config.confidence_level, 0.9);
    assert_eq!(config.log_dir.to_str(), Some("/var/plotty/logs"));
    assert_eq!(config.styles, Some(dir.path().join("styles.json")));
    assert_eq!(config.plotter.args, vec!["-persist"]);
    assert!(config.tabulate.background);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempdir().unwrap();

    let err = load_config(dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn malformed_hcl_is_a_parse_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), "confidence_level = = 1").unwrap();

    let err = load_config(dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
}
