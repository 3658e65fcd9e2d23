use crate::model::{DataTable, LogRecord, Value};
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;

fn record(scenario: &[(&str, &str)], values: &[(&str, &str)]) -> LogRecord {
    let mut r = LogRecord::new(
        scenario
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
    );
    for (k, v) in values {
        r.push(*k, *v);
    }
    r
}

fn table() -> DataTable {
    DataTable::from_records(
        "run1",
        vec![
            record(&[("benchmark", "fop")], &[("bmtime", "100")]),
            record(&[("benchmark", "fop")], &[("time.gc", "7")]),
            record(&[("benchmark", "luindex")], &[("bmtime", "oops")]),
        ],
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )
}

#[test]
fn records_with_same_scenario_merge_into_one_row() {
    // Act
    let table = table();

    // Assert
    assert_eq!(table.len(), 2);
    let fop = &table.rows[0];
    assert_eq!(fop.raw("log"), Some("run1"));
    assert_eq!(fop.values.len(), 2);
    assert!(matches!(fop.values.get("bmtime"), Some(Value::Number(v)) if *v == 100.0));
}

#[test]
fn non_numeric_values_become_warnings() {
    let table = table();
    assert_eq!(table.messages.warn.len(), 1);
    assert!(table.rows[1].values.is_empty());
}

#[test]
fn declared_columns_cover_all_rows() {
    let (scenarios, values) = table().headers();
    assert_eq!(scenarios, vec!["benchmark", "log"]);
    assert_eq!(values, vec!["bmtime", "time.gc"]);
}

#[test]
fn selecting_value_columns_drops_the_rest() {
    // Arrange
    let mut table = table();

    // Act
    table.select_value_columns(&["bmtime".to_string()]);

    // Assert
    assert!(table.rows.iter().all(|r| !r.values.contains_key("time.gc")));
    assert_eq!(table.value_columns.len(), 1);
}

#[test]
fn selecting_unknown_scenario_columns_warns() {
    // Arrange
    let mut table = table();

    // Act
    table.select_scenario_columns(&["benchmark".to_string(), "heap".to_string()]);

    // Assert
    assert_eq!(table.scenario_columns.len(), 1);
    assert!(table.rows.iter().all(|r| r.scenario.len() == 1));
    assert!(
        table
            .messages
            .warn
            .iter()
            .any(|(title, _)| title.contains("Unknown scenario"))
    );
}

#[test]
fn empty_selection_keeps_everything() {
    let mut table = table();
    table.select_scenario_columns(&[]);
    assert_eq!(table.scenario_columns.len(), 2);
}

#[test]
fn merge_takes_latest_modification_time() {
    // Arrange
    let mut a = table();
    let mut b = table();
    b.last_modified = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    // Act
    a.merge(b);

    // Assert
    assert_eq!(a.len(), 4);
    assert_eq!(a.last_modified.format("%Y").to_string(), "2025");
    assert_eq!(a.messages.warn.len(), 2);
}

#[test]
fn derived_column_skips_rows_without_operands() {
    // Arrange
    let mut table = table();

    // Act
    table.add_derived_column("double", |row| row.values.get("bmtime").map(|v| v.value() * 2.0));

    // Assert
    assert!(table.value_columns.contains("double"));
    assert_eq!(table.rows[0].values["double"].value(), 200.0);
    assert!(!table.rows[1].values.contains_key("double"));
}
