use super::test_helpers::{row, run, table};
use crate::block::{BlockOutput, GraphKind, GraphOutput};
use crate::model::{ScenarioCell, ScenarioValue, Value};
use pretty_assertions::assert_eq;

fn results() -> crate::model::DataTable {
    table(vec![
        row(&[("benchmark", "fop"), ("heap", "128"), ("vm", "a")], &[("bmtime", 4.0)]),
        row(&[("benchmark", "fop"), ("heap", "64"), ("vm", "a")], &[("bmtime", 8.0)]),
        row(&[("benchmark", "Luindex"), ("heap", "64"), ("vm", "a")], &[("bmtime", 2.0)]),
        row(&[("benchmark", "fop"), ("heap", "64"), ("vm", "b")], &[("bmtime", 1.0)]),
    ])
}

fn graphs(text: &str, table: &mut crate::model::DataTable) -> Vec<GraphOutput> {
    match run(text, table).unwrap() {
        BlockOutput::Graphs(graphs) => graphs,
        BlockOutput::Continue => panic!("graph block produced no graphs"),
    }
}

#[test]
fn histogram_pivots_one_graph_per_residual_scenario() {
    // Arrange
    let mut table = results();

    // Act
    let graphs = graphs("4&1&heap&benchmark&bmtime", &mut table);

    // Assert
    assert_eq!(graphs.len(), 2);
    let a = &graphs[0];
    assert_eq!(a.kind, GraphKind::Histogram);
    assert_eq!(a.title, "vm = a");
    assert_eq!(a.columns, vec!["64", "128"]);
    assert_eq!(
        a.rows.iter().map(|r| r.key.as_str()).collect::<Vec<_>>(),
        vec!["fop", "Luindex"]
    );
    assert!(matches!(a.cell("fop", "128"), Some(Value::Number(v)) if *v == 4.0));
    assert!(a.cell("Luindex", "128").is_none());
}

#[test]
fn column_stats_cover_populated_cells() {
    let mut table = results();

    let graphs = graphs("4&1&heap&benchmark&bmtime", &mut table);

    let heap64 = &graphs[0].stats[0];
    assert_eq!(heap64.count, 2);
    assert_eq!(heap64.min, 2.0);
    assert_eq!(heap64.max, 8.0);
    assert_eq!(heap64.mean, 5.0);
    assert!((heap64.geomean - 4.0).abs() < 1e-12);
}

#[test]
fn csv_carries_bounds_for_every_column() {
    let mut table = results();

    let graphs = graphs("4&2&heap&benchmark&bmtime&wide", &mut table);

    let csv = &graphs[0].csv;
    let header = csv.lines().next().unwrap();
    assert_eq!(
        header,
        "benchmark,64,64.95.0%-CI.lowerBound,64.95.0%-CI.upperBound,\
         128,128.95.0%-CI.lowerBound,128.95.0%-CI.upperBound"
    );
    assert!(csv.contains("Luindex,2.000000,2.000000,2.000000,,,"));
    assert_eq!(graphs[0].style.as_deref(), Some("wide"));
}

#[test]
fn duplicate_cell_is_ambiguous() {
    // Arrange
    let mut table = results();
    table.rows[3].scenario.insert("vm".into(), "a".into());

    // Act
    let err = run("4&1&heap&benchmark&bmtime", &mut table).unwrap_err();

    // Assert
    assert!(err.is_ambiguity());
}

#[test]
fn scatter_keeps_rows_with_both_values() {
    // Arrange
    let mut table = results();
    table.rows[0].values.insert("gc".into(), Value::Number(0.5));
    table.value_columns.insert("gc".into());

    // Act
    let graphs = graphs("4&3&bmtime&gc", &mut table);

    // Assert
    assert_eq!(graphs.len(), 1);
    assert_eq!(graphs[0].rows.len(), 1);
    assert_eq!(graphs[0].columns, vec!["bmtime", "gc"]);
}

#[test]
fn series_uses_value_columns_as_columns() {
    let mut table = results();

    let graphs = graphs("4&4&heap&bmtime", &mut table);

    assert_eq!(graphs.len(), 3);
    assert_eq!(graphs[0].columns, vec!["bmtime"]);
    assert_eq!(graphs[0].title, "benchmark = fop, vm = a");
    assert_eq!(graphs[0].rows[0].key, "64");
}

//-----------------------------------------------------------------------------
// Key ordering
//-----------------------------------------------------------------------------

fn styled(value: &str, display: &str, index: i64) -> ScenarioCell {
    ScenarioCell::Styled(ScenarioValue {
        value: value.to_string(),
        display: display.to_string(),
        index,
        group: None,
        color: None,
    })
}

fn row_keys(graph: &GraphOutput) -> Vec<&str> {
    graph.rows.iter().map(|r| r.key.as_str()).collect()
}

#[test]
fn numeric_keys_sort_by_value() {
    // Arrange
    let mut table = table(vec![
        row(&[("benchmark", "fop"), ("heap", "128")], &[("bmtime", 1.0)]),
        row(&[("benchmark", "fop"), ("heap", "1024")], &[("bmtime", 2.0)]),
        row(&[("benchmark", "fop"), ("heap", "64")], &[("bmtime", 3.0)]),
    ]);

    // Act
    let graphs = graphs("4&1&heap&benchmark&bmtime", &mut table);

    // Assert
    assert_eq!(graphs[0].columns, vec!["64", "128", "1024"]);
}

#[test]
fn formatted_keys_sort_by_style_index() {
    // Arrange
    let mut table = table(vec![
        row(&[("benchmark", "avrora"), ("heap", "64")], &[("bmtime", 1.0)]),
        row(&[("benchmark", "lusearch"), ("heap", "64")], &[("bmtime", 2.0)]),
        row(&[("benchmark", "batik"), ("heap", "64")], &[("bmtime", 3.0)]),
    ]);
    table.rows[0].scenario.insert("benchmark".into(), styled("avrora", "Avrora", 2));
    table.rows[1].scenario.insert("benchmark".into(), styled("lusearch", "Lusearch", 0));
    table.rows[2].scenario.insert("benchmark".into(), styled("batik", "Batik", 1));

    // Act
    let graphs = graphs("4&1&heap&benchmark&bmtime", &mut table);

    // Assert
    assert_eq!(row_keys(&graphs[0]), vec!["Lusearch", "Batik", "Avrora"]);
}

#[test]
fn mixed_case_keys_sort_case_insensitively() {
    // Arrange
    let mut table = table(vec![
        row(&[("benchmark", "Gamma"), ("heap", "64")], &[("bmtime", 1.0)]),
        row(&[("benchmark", "alpha"), ("heap", "64")], &[("bmtime", 2.0)]),
        row(&[("benchmark", "Beta"), ("heap", "64")], &[("bmtime", 3.0)]),
    ]);

    // Act
    let graphs = graphs("4&1&heap&benchmark&bmtime", &mut table);

    // Assert
    assert_eq!(row_keys(&graphs[0]), vec!["alpha", "Beta", "Gamma"]);
}

#[test]
fn partly_formatted_keys_fall_back_to_alphabetical() {
    // Arrange
    let mut table = table(vec![
        row(&[("benchmark", "zxing"), ("heap", "64")], &[("bmtime", 1.0)]),
        row(&[("benchmark", "avrora"), ("heap", "64")], &[("bmtime", 2.0)]),
    ]);
    table.rows[0].scenario.insert("benchmark".into(), styled("zxing", "Zxing", 0));

    // Act
    let graphs = graphs("4&1&heap&benchmark&bmtime", &mut table);

    // Assert
    assert_eq!(row_keys(&graphs[0]), vec!["avrora", "Zxing"]);
}
