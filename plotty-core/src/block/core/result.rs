use crate::model::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum BlockOutput {
    /// The table was transformed in place; move on to the next block.
    Continue,

    /// The block produced graph data sets alongside the table.
    Graphs(Vec<GraphOutput>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Histogram,
    Xy,
    Scatter,
    Series,
}

/// Summary of the populated cells of one graph column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    #[serde(with = "crate::util::serde_float")]
    pub min: f64,
    #[serde(with = "crate::util::serde_float")]
    pub max: f64,
    #[serde(with = "crate::util::serde_float")]
    pub mean: f64,
    #[serde(with = "crate::util::serde_float")]
    pub geomean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphRow {
    pub key: String,
    pub cells: Vec<Option<Value>>,
}

/// A graph-ready grid: one row per row key, one cell per column key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphOutput {
    pub kind: GraphKind,
    pub title: String,
    pub style: Option<String>,
    pub row_header: String,
    pub value_label: String,
    pub columns: Vec<String>,
    pub rows: Vec<GraphRow>,
    pub stats: Vec<ColumnStats>,
    pub csv: String,
}

impl GraphOutput {
    pub fn cell(&self, row: &str, column: &str) -> Option<&Value> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|r| r.key == row)
            .and_then(|r| r.cells.get(col))
            .and_then(Option::as_ref)
    }
}
