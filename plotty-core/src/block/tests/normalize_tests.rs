use super::test_helpers::{row, run, table, value};
use crate::model::Value;

fn builds() -> crate::model::DataTable {
    table(vec![
        row(&[("benchmark", "fop"), ("build", "jdk8")], &[("bmtime", 10.0), ("gc", 2.0)]),
        row(&[("benchmark", "fop"), ("build", "jdk11")], &[("bmtime", 5.0), ("gc", 4.0)]),
        row(&[("benchmark", "luindex"), ("build", "jdk8")], &[("bmtime", 20.0)]),
        row(&[("benchmark", "luindex"), ("build", "jdk11")], &[("bmtime", 40.0), ("gc", 1.0)]),
        row(&[("benchmark", "pmd"), ("build", "jdk11")], &[("bmtime", 3.0)]),
    ])
}

#[test]
fn select_divides_each_group_by_its_baseline() {
    // Arrange
    let mut table = builds();

    // Act
    run("3&1&build^jdk8&benchmark", &mut table).unwrap();

    // Assert
    assert_eq!(table.len(), 4);
    assert_eq!(value(&table.rows[0], "bmtime"), 1.0);
    assert_eq!(value(&table.rows[1], "bmtime"), 0.5);
    assert_eq!(value(&table.rows[1], "gc"), 2.0);
    assert_eq!(value(&table.rows[3], "bmtime"), 2.0);
    assert!(!table.rows[3].values.contains_key("gc"));
}

#[test]
fn groups_without_a_baseline_are_dropped() {
    let mut table = builds();

    run("3&1&build^jdk8&benchmark", &mut table).unwrap();

    assert!(table.iter().all(|r| r.raw("benchmark") != Some("pmd")));
    assert_eq!(table.messages.info.len(), 1);
}

#[test]
fn invert_divides_the_baseline_by_the_value() {
    let mut table = builds();

    run("31&1&build^jdk8&benchmark", &mut table).unwrap();

    assert_eq!(value(&table.rows[1], "bmtime"), 2.0);
}

#[test]
fn best_uses_the_smallest_positive_value() {
    // Arrange
    let mut table = builds();

    // Act
    run("3&2&benchmark", &mut table).unwrap();

    // Assert
    assert_eq!(value(&table.rows[0], "bmtime"), 2.0);
    assert_eq!(value(&table.rows[1], "bmtime"), 1.0);
    assert_eq!(value(&table.rows[4], "bmtime"), 1.0);
}

#[test]
fn best_baseline_of_a_single_sample_aggregate_has_flat_bounds() {
    // Arrange
    let mut table = builds();
    run("1&benchmark^1^pmd", &mut table).unwrap();
    run("2&1&build", &mut table).unwrap();

    // Act
    run("3&2", &mut table).unwrap();

    // Assert
    let bmtime = &table.rows[0].values["bmtime"];
    assert!(matches!(bmtime, Value::Aggregate(_)));
    assert_eq!(bmtime.value(), 1.0);
    assert_eq!(bmtime.bounds(), (1.0, 1.0));
}

#[test]
fn pinning_divides_every_metric_by_one_column() {
    let mut table = builds();

    run("32&1;gc&build^jdk11&benchmark", &mut table).unwrap();

    let fop = &table.rows[0];
    assert_eq!(value(fop, "bmtime"), 2.5);
    assert_eq!(value(fop, "gc"), 0.5);
}

#[test]
fn two_baselines_in_one_group_are_ambiguous() {
    // Arrange
    let mut table = builds();

    // Act
    let err = run("3&1&build^jdk8", &mut table).unwrap_err();

    // Assert
    assert!(err.is_ambiguity());
}
