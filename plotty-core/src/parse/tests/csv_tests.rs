use crate::parse::{CsvLayout, ParseError, detect_layout, load_csv};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn layout_is_detected_from_headers() {
    let path = Path::new("x.csv");
    assert_eq!(
        detect_layout(path, &headers(&["benchmark", "key", "value"])).unwrap(),
        CsvLayout::Long
    );
    assert_eq!(
        detect_layout(path, &headers(&["benchmark", "value.bmtime"])).unwrap(),
        CsvLayout::Wide
    );
}

#[test]
fn mixed_or_missing_value_columns_are_rejected() {
    let path = Path::new("x.csv");
    assert!(matches!(
        detect_layout(path, &headers(&["key", "value", "value.bmtime"])),
        Err(ParseError::CsvFormat { .. })
    ));
    assert!(matches!(
        detect_layout(path, &headers(&["benchmark", "bmtime"])),
        Err(ParseError::CsvFormat { .. })
    ));
}

#[test]
fn long_csv_merges_rows_of_one_scenario() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.csv");
    fs::write(
        &path,
        "benchmark,heap,key,value\nfop,64,bmtime,100\nfop,64,time.gc,7\nluindex,,bmtime,50\nbroken\n",
    )
    .unwrap();

    // Act
    let records = load_csv("run.csv", &path).unwrap();

    // Assert
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].values.len(), 2);
    assert_eq!(records[0].scenario["log"], "run.csv");
    assert!(!records[1].scenario.contains_key("heap"));
}

#[test]
fn wide_csv_skips_non_numeric_values() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("wide.csv");
    fs::write(
        &path,
        "benchmark,value.bmtime,value.gc\nfop,100,n/a\nluindex,50,3\n",
    )
    .unwrap();

    // Act
    let records = load_csv("wide", &path).unwrap();

    // Assert
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].values, vec![("bmtime".to_string(), "100".to_string())]);
    assert_eq!(records[1].get("gc"), Some("3"));
}
