use super::test_helpers::{row, run, table};
use crate::block::BlockError;

fn builds() -> crate::model::DataTable {
    table(vec![
        row(&[("build", "jdk11")], &[("bmtime", 1.0)]),
        row(&[("build", "jdk8")], &[("bmtime", 2.0)]),
        row(&[("build", "graal")], &[("bmtime", 3.0)]),
        row(&[("build", "graal")], &[("bmtime", 4.0)]),
    ])
}

#[test]
fn raw_values_become_styled_cells() {
    // Arrange
    let mut table = builds();

    // Act
    run("7&builds&build", &mut table).unwrap();

    // Assert
    let cell = &table.rows[0].scenario["build"];
    assert!(cell.is_styled());
    assert_eq!(cell.raw(), "jdk11");
    assert_eq!(cell.display(), "JDK 11");
    assert_eq!(cell.style_index(), Some(1));
}

#[test]
fn unmatched_values_warn_once_each() {
    let mut table = builds();

    run("7&builds&build", &mut table).unwrap();

    assert!(!table.rows[2].scenario["build"].is_styled());
    assert_eq!(table.messages.warn.len(), 1);
}

#[test]
fn value_header_mode_sets_labels() {
    let mut table = builds();

    run("71&metrics", &mut table).unwrap();

    assert_eq!(table.value_label("bmtime"), "Execution time (ms)");
}

#[test]
fn missing_style_is_structural() {
    let mut table = builds();

    let err = run("7&colors&build", &mut table).unwrap_err();

    assert!(matches!(err, BlockError::MissingStyle { ref key } if key == "colors"));
}
