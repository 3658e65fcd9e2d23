use crate::block::{BlockContext, BlockRegistry, BlockSpec};
use crate::model::{DataRow, DataTable, ScenarioCell, Value};
use crate::style::JsonStyleStore;

pub fn row(scenario: &[(&str, &str)], values: &[(&str, f64)]) -> DataRow {
    let mut row = DataRow::new(
        scenario
            .iter()
            .map(|(k, v)| (k.to_string(), ScenarioCell::from(*v)))
            .collect(),
    );
    for (k, v) in values {
        row.values.insert(k.to_string(), Value::Number(*v));
    }
    row
}

pub fn table(rows: Vec<DataRow>) -> DataTable {
    let mut table = DataTable::new();
    for r in &rows {
        table.scenario_columns.extend(r.scenario.keys().cloned());
        table.value_columns.extend(r.values.keys().cloned());
    }
    table.rows = rows;
    table
}

pub fn block(text: &str) -> BlockSpec {
    BlockRegistry::new().decode(text).unwrap()
}

pub fn styles() -> JsonStyleStore {
    serde_json::from_str(
        r#"{
            "format_styles": {
                "builds": [
                    { "value": "jdk8", "display": "JDK 8" },
                    { "value": "jdk11", "display": "JDK 11" }
                ],
                "metrics": [
                    { "value": "bmtime", "display": "Execution time (ms)" }
                ]
            }
        }"#,
    )
    .unwrap()
}

pub fn with_ctx<T>(styles: &JsonStyleStore, f: impl FnOnce(&BlockContext<'_>) -> T) -> T {
    let ctx = BlockContext {
        styles,
        confidence: 0.95,
    };
    f(&ctx)
}

pub fn run(text: &str, table: &mut DataTable) -> Result<crate::block::BlockOutput, crate::block::BlockError> {
    let styles = styles();
    with_ctx(&styles, |ctx| block(text).apply(table, ctx))
}

pub fn value(row: &DataRow, metric: &str) -> f64 {
    row.values[metric].value()
}
