use integration_tests::harness::TestWorkspace;
use plotty_core::cache::MemoryCache;
use plotty_core::conf::{ConfigError, load_config};
use plotty_core::model::ScenarioCell;
use plotty_core::pipeline::{Engine, Pipeline};
use plotty_core::source::LogDirectory;
use plotty_core::style::JsonStyleStore;

const STYLES: &str = r#"{
    "format_styles": {
        "builds": [
            { "value": "jdk11", "display": "JDK 11" },
            { "value": "jdk8", "display": "JDK 8" }
        ]
    }
}"#;

#[test]
fn relative_paths_resolve_against_the_config_dir() {
    let ws = TestWorkspace::new("");

    let config = ws.config();

    assert_eq!(config.log_dir, ws.root().join("logs"));
    assert_eq!(config.cache_dir, ws.root().join("cache"));
    assert_eq!(config.plotter.executable, "gnuplot");
}

#[test]
fn invalid_confidence_levels_are_rejected() {
    let ws = TestWorkspace::new("");
    ws.write_file("plotty.hcl", "confidence_level = 1.5\n");

    let err = load_config(ws.root()).unwrap_err();

    let ConfigError::Validation { report } = err else {
        panic!("expected a validation error");
    };
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].field, "confidence_level");
}

#[test]
fn configured_styles_format_csv_logs() {
    // Arrange
    let ws = TestWorkspace::new("styles = \"styles.json\"");
    ws.write_file("styles.json", STYLES);
    ws.write_csv(
        "wide.csv",
        "benchmark,build,value.bmtime\nfop,jdk8,10\nfop,jdk11,8\n",
    );
    let config = ws.config();
    let styles = JsonStyleStore::load(config.styles.as_deref().unwrap()).unwrap();
    let cache = MemoryCache::new();
    let source = LogDirectory::from_config(&config);
    let engine = Engine::new(&cache, &source, &styles, config.confidence_level);

    // Act
    let output = engine
        .apply(&Pipeline::decode("0|wide&&&|7&builds&build").unwrap())
        .unwrap();

    // Assert
    let displays: Vec<&str> = output
        .table
        .iter()
        .map(|r| r.scenario["build"].display())
        .collect();
    assert_eq!(displays, vec!["JDK 8", "JDK 11"]);
    assert!(matches!(
        output.table.rows[1].scenario["build"],
        ScenarioCell::Styled(ref v) if v.index == 0
    ));
}
