use super::test_helpers::{row, run, table};
use crate::block::BlockError;

fn timings() -> crate::model::DataTable {
    table(vec![
        row(&[("benchmark", "fop"), ("heap", "64")], &[("bmtime", 10.0)]),
        row(&[("benchmark", "fop"), ("heap", "128")], &[("bmtime", 20.0)]),
        row(&[("benchmark", "luindex"), ("heap", "64")], &[("bmtime", 30.0)]),
        row(&[("benchmark", "pmd")], &[("time.gc", 4.0)]),
    ])
}

//-----------------------------------------------------------------------------
// Value filter
//-----------------------------------------------------------------------------

#[test]
fn value_filter_keeps_values_inside_an_inclusive_range() {
    // Arrange
    let mut table = timings();

    // Act
    run("5&bmtime^1^10;20", &mut table).unwrap();

    // Assert
    assert_eq!(table.len(), 2);
}

#[test]
fn value_filter_outside_drops_rows_without_the_value() {
    let mut table = timings();

    run("5&bmtime^2^;15", &mut table).unwrap();

    assert_eq!(table.len(), 2);
    assert!(table.iter().all(|r| r.values.contains_key("bmtime")));
}

#[test]
fn value_filter_rejects_unparsable_bounds() {
    let mut table = timings();

    let err = run("5&bmtime^1^ten;20", &mut table).unwrap_err();

    assert!(matches!(err, BlockError::InvalidBound { ref bound, .. } if bound == "ten"));
}

//-----------------------------------------------------------------------------
// Composite scenario
//-----------------------------------------------------------------------------

#[test]
fn composite_joins_raw_values_into_one_column() {
    // Arrange
    let mut table = timings();

    // Act
    run("6&benchmark^heap", &mut table).unwrap();

    // Assert
    assert_eq!(table.len(), 3);
    assert_eq!(table.rows[0].raw("benchmark-heap"), Some("fop-64"));
    assert!(table.scenario_columns.contains("benchmark-heap"));
    assert!(!table.scenario_columns.contains("heap"));
    assert_eq!(table.messages.info.len(), 1);
}
