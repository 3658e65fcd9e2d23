use integration_tests::harness::{TestWorkspace, passed_log};
use plotty_core::cache::MemoryCache;
use plotty_core::parse::status_file_path;
use plotty_core::pipeline::{Engine, Pipeline, PipelineError, tabulation_status};
use plotty_core::source::{LogDirectory, LogSource};
use plotty_core::style::JsonStyleStore;

#[test]
fn log_directories_are_tabulated_into_the_tabulate_dir() {
    // Arrange
    let ws = TestWorkspace::new("");
    ws.write_log("run1", "fop.2.64.jdk8.log.gz", &passed_log(&[100, 110]));
    let config = ws.config();
    let source = LogDirectory::from_config(&config);

    // Act
    let table = source.load("run1").unwrap();

    // Assert
    assert_eq!(table.len(), 2);
    assert!(config.tabulate_dir.join("run1.csv.gz").is_file());
    assert!(table.iter().all(|r| r.raw("log") == Some("run1")));
    assert!(table.iter().all(|r| r.raw("build") == Some("jdk8")));
}

#[test]
fn the_tabulate_command_reports_progress() {
    // Arrange
    let ws = TestWorkspace::new("");
    ws.write_log("run1", "fop.2.64.jdk8.log.gz", &passed_log(&[100]));
    ws.write_log("run1", "luindex.2.64.jdk8.log.gz", &passed_log(&[50]));
    let out = ws.root().join("run1.csv.gz");
    let status_dir = ws.root().join("status");

    // Act
    plotty_core::cli::tabulate::tabulate(ws.log_dir("run1"), out.clone(), Some(status_dir.clone()))
        .unwrap();

    // Assert
    let status =
        tabulation_status(&status_file_path(&status_dir, std::process::id())).unwrap();
    assert!(out.is_file());
    assert_eq!(status.total, 3);
    assert!(status.is_complete());
}

#[test]
fn background_tabulation_is_reported_as_in_progress() {
    // Arrange
    let ws = TestWorkspace::new(
        "tabulate {\n  background = true\n  worker = \"/bin/true\"\n}\n",
    );
    ws.write_log("run1", "fop.2.64.jdk8.log.gz", &passed_log(&[100]));
    let config = ws.config();
    let cache = MemoryCache::new();
    let source = LogDirectory::from_config(&config);
    let styles = JsonStyleStore::empty();
    let engine = Engine::new(&cache, &source, &styles, config.confidence_level);

    // Act
    let err = engine
        .apply(&Pipeline::decode("0|run1&&&").unwrap())
        .unwrap_err();

    // Assert
    assert!(err.is_recoverable());
    let PipelineError::TabulationInProgress {
        log, status_file, ..
    } = err
    else {
        panic!("expected tabulation in progress");
    };
    assert_eq!(log, "run1");
    assert!(status_file.starts_with(&config.status_dir));
    assert!(config.tabulate_dir.join("run1.pid").is_file());
}
