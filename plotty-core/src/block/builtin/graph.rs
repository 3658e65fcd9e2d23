use crate::block::core::errors::{BlockDecodeError, BlockError};
use crate::block::core::result::{ColumnStats, GraphKind, GraphOutput, GraphRow};
use crate::block::core::{
    Block, BlockContext, BlockKind, BlockOutput, parse_type, require_scenario_columns,
    require_value_columns,
};
use crate::model::{DataRow, DataTable, ScenarioCell, Value, geomean};
use crate::pipeline::encoding::{join_params, split_params};
use crate::util::fingerprint::{Columns, fingerprint};
use crate::util::present::{format_float, present_value_csv};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Where a graph takes its row keys, column keys and cells from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphLayout {
    /// Cells of `value`, pivoted on two scenario columns.
    Pivot {
        column: String,
        row: String,
        value: String,
    },
    /// One point per row that has both values.
    Scatter { x: String, y: String },
    /// One row per value of a scenario column, one column per listed metric.
    Series { row: String, values: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphBlock {
    pub flags: u32,
    pub kind: GraphKind,
    pub layout: GraphLayout,
    /// Graph template used when plotting.
    pub style: Option<String>,
}

/// A row or column key: identified by its raw value, shown by its display text.
#[derive(Debug, Clone)]
struct Key {
    raw: String,
    display: String,
    index: Option<i64>,
}

impl Key {
    fn from_cell(cell: &ScenarioCell) -> Self {
        Self {
            raw: cell.raw().to_string(),
            display: cell.display().to_string(),
            index: cell.style_index(),
        }
    }
}

/// A grid under construction, before its keys are sorted.
struct Grid {
    title: String,
    rows: Vec<Key>,
    columns: Vec<Key>,
    cells: AHashMap<(String, String), Value>,
}

impl Grid {
    fn new(title: String) -> Self {
        Self {
            title,
            rows: Vec::new(),
            columns: Vec::new(),
            cells: AHashMap::new(),
        }
    }

    fn key(keys: &mut Vec<Key>, key: Key) {
        if !keys.iter().any(|k| k.raw == key.raw) {
            keys.push(key);
        }
    }

    /// Places a cell; returns false if it is already occupied.
    fn place(&mut self, row: Key, column: Key, value: Value) -> bool {
        let slot = (row.raw.clone(), column.raw.clone());
        if self.cells.contains_key(&slot) {
            return false;
        }
        Self::key(&mut self.rows, row);
        Self::key(&mut self.columns, column);
        self.cells.insert(slot, value);
        true
    }
}

impl GraphBlock {
    fn scenario_columns(&self) -> Vec<&str> {
        match &self.layout {
            GraphLayout::Pivot { column, row, .. } => vec![column.as_str(), row.as_str()],
            GraphLayout::Scatter { .. } => vec![],
            GraphLayout::Series { row, .. } => vec![row.as_str()],
        }
    }

    fn value_columns(&self) -> Vec<&str> {
        match &self.layout {
            GraphLayout::Pivot { value, .. } => vec![value.as_str()],
            GraphLayout::Scatter { x, y } => vec![x.as_str(), y.as_str()],
            GraphLayout::Series { values, .. } => values.iter().map(String::as_str).collect(),
        }
    }

    fn pivot(
        &self,
        table: &DataTable,
        column: &str,
        row: &str,
        value: &str,
    ) -> Result<Vec<Grid>, BlockError> {
        let excluded = [column, row];
        let mut index: AHashMap<String, usize> = AHashMap::new();
        let mut grids: Vec<Grid> = Vec::new();

        for data in table.iter() {
            let (Some(col_cell), Some(row_cell), Some(v)) = (
                data.scenario.get(column),
                data.scenario.get(row),
                data.values.get(value),
            ) else {
                continue;
            };

            let key = fingerprint(&data.scenario, Columns::Exclude(&excluded));
            let slot = *index.entry(key).or_insert_with(|| {
                grids.push(Grid::new(title(data, &excluded)));
                grids.len() - 1
            });

            let placed = grids[slot].place(
                Key::from_cell(row_cell),
                Key::from_cell(col_cell),
                v.clone(),
            );
            if !placed {
                return Err(BlockError::ambiguity(format!(
                    "more than one value exists for the graph cell ({row} = {}, {column} = {}) \
                     in '{}'",
                    row_cell.raw(),
                    col_cell.raw(),
                    grids[slot].title
                )));
            }
        }

        Ok(grids)
    }

    fn series(
        &self,
        table: &DataTable,
        row: &str,
        values: &[String],
    ) -> Result<Vec<Grid>, BlockError> {
        let excluded = [row];
        let mut index: AHashMap<String, usize> = AHashMap::new();
        let mut grids: Vec<Grid> = Vec::new();

        for data in table.iter() {
            let Some(row_cell) = data.scenario.get(row) else {
                continue;
            };
            if !values.iter().any(|v| data.values.contains_key(v)) {
                continue;
            }

            let key = fingerprint(&data.scenario, Columns::Exclude(&excluded));
            let slot = *index.entry(key).or_insert_with(|| {
                let mut grid = Grid::new(title(data, &excluded));
                for v in values {
                    Grid::key(
                        &mut grid.columns,
                        Key {
                            raw: v.clone(),
                            display: table.value_label(v).to_string(),
                            index: None,
                        },
                    );
                }
                grids.push(grid);
                grids.len() - 1
            });

            let grid = &mut grids[slot];
            if grid.rows.iter().any(|k| k.raw == row_cell.raw()) {
                return Err(BlockError::ambiguity(format!(
                    "more than one row has {row} = {} in '{}'",
                    row_cell.raw(),
                    grid.title
                )));
            }
            Grid::key(&mut grid.rows, Key::from_cell(row_cell));
            for v in values {
                if let Some(cell) = data.values.get(v) {
                    grid.cells
                        .insert((row_cell.raw().to_string(), v.clone()), cell.clone());
                }
            }
        }

        Ok(grids)
    }

    fn scatter(&self, table: &DataTable, x: &str, y: &str) -> Grid {
        let mut grid = Grid::new("Scatter graph".to_string());
        for axis in [x, y] {
            grid.columns.push(Key {
                raw: axis.to_string(),
                display: table.value_label(axis).to_string(),
                index: None,
            });
        }

        for data in table.iter() {
            let (Some(xv), Some(yv)) = (data.values.get(x), data.values.get(y)) else {
                continue;
            };
            let label = scenario_label(data);
            let raw = format!("{}#{}", grid.rows.len(), label);
            grid.rows.push(Key {
                raw: raw.clone(),
                display: label,
                index: None,
            });
            grid.cells.insert((raw.clone(), x.to_string()), xv.clone());
            grid.cells.insert((raw, y.to_string()), yv.clone());
        }
        grid
    }

    fn render(
        &self,
        grid: Grid,
        table: &DataTable,
        confidence: f64,
    ) -> Result<GraphOutput, BlockError> {
        let Grid {
            title,
            mut rows,
            mut columns,
            mut cells,
        } = grid;

        // Scatter points stay in table order and listed value columns stay as listed.
        if self.kind != GraphKind::Scatter {
            sort_keys(&mut rows);
        }
        if matches!(self.layout, GraphLayout::Pivot { .. }) {
            sort_keys(&mut columns);
        }

        let graph_rows: Vec<GraphRow> = rows
            .iter()
            .map(|r| GraphRow {
                key: r.display.clone(),
                cells: columns
                    .iter()
                    .map(|c| cells.remove(&(r.raw.clone(), c.raw.clone())))
                    .collect(),
            })
            .collect();

        let stats: Vec<ColumnStats> = (0..columns.len())
            .map(|i| column_stats(graph_rows.iter().filter_map(|r| r.cells[i].as_ref())))
            .collect();

        let (row_header, value_label) = match &self.layout {
            GraphLayout::Pivot { row, value, .. } => {
                (row.clone(), table.value_label(value).to_string())
            }
            GraphLayout::Scatter { x, y } => (
                table.value_label(x).to_string(),
                table.value_label(y).to_string(),
            ),
            GraphLayout::Series { row, values } => (
                row.clone(),
                values
                    .iter()
                    .map(|v| table.value_label(v))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        };

        let column_names: Vec<String> = columns.into_iter().map(|c| c.display).collect();
        let csv = render_csv(&row_header, &column_names, &graph_rows, &stats, confidence)?;

        Ok(GraphOutput {
            kind: self.kind,
            title,
            style: self.style.clone(),
            row_header,
            value_label,
            columns: column_names,
            rows: graph_rows,
            stats,
            csv,
        })
    }
}

impl Block for GraphBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Graph
    }

    fn decode(flags: u32, groups: &[&str]) -> Result<Self, BlockDecodeError> {
        let (ty, _) = parse_type("graph", groups.first())?;
        let param = |i: usize, what: &'static str| -> Result<String, BlockDecodeError> {
            groups
                .get(i)
                .filter(|g| !g.is_empty())
                .map(|g| g.to_string())
                .ok_or_else(|| BlockDecodeError::missing("graph", what))
        };
        let style_at = |i: usize| groups.get(i).filter(|g| !g.is_empty()).map(|g| g.to_string());

        let (kind, layout, style) = match ty {
            1 | 2 => (
                if ty == 1 {
                    GraphKind::Histogram
                } else {
                    GraphKind::Xy
                },
                GraphLayout::Pivot {
                    column: param(1, "column")?,
                    row: param(2, "row")?,
                    value: param(3, "value")?,
                },
                style_at(4),
            ),
            3 => (
                GraphKind::Scatter,
                GraphLayout::Scatter {
                    x: param(1, "x value")?,
                    y: param(2, "y value")?,
                },
                style_at(3),
            ),
            4 => {
                let values: Vec<String> = split_params(&param(2, "values")?)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                (
                    GraphKind::Series,
                    GraphLayout::Series {
                        row: param(1, "row")?,
                        values,
                    },
                    style_at(3),
                )
            }
            other => return Err(BlockDecodeError::invalid("graph", "type", other.to_string())),
        };

        Ok(Self {
            flags,
            kind,
            layout,
            style,
        })
    }

    fn flags(&self) -> u32 {
        self.flags
    }

    fn encode_params(&self) -> Vec<String> {
        let ty = match self.kind {
            GraphKind::Histogram => "1",
            GraphKind::Xy => "2",
            GraphKind::Scatter => "3",
            GraphKind::Series => "4",
        };
        let mut out = vec![ty.to_string()];
        match &self.layout {
            GraphLayout::Pivot { column, row, value } => {
                out.extend([column.clone(), row.clone(), value.clone()]);
            }
            GraphLayout::Scatter { x, y } => out.extend([x.clone(), y.clone()]),
            GraphLayout::Series { row, values } => {
                out.extend([row.clone(), join_params(values)]);
            }
        }
        out.extend(self.style.clone());
        out
    }

    fn apply(
        &self,
        table: &mut DataTable,
        ctx: &BlockContext<'_>,
    ) -> Result<BlockOutput, BlockError> {
        require_scenario_columns(table, &self.scenario_columns())?;
        require_value_columns(table, &self.value_columns())?;

        let grids = match &self.layout {
            GraphLayout::Pivot { column, row, value } => self.pivot(table, column, row, value)?,
            GraphLayout::Scatter { x, y } => vec![self.scatter(table, x, y)],
            GraphLayout::Series { row, values } => self.series(table, row, values)?,
        };

        let graphs = grids
            .into_iter()
            .map(|grid| self.render(grid, table, ctx.confidence))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(kind = ?self.kind, graphs = graphs.len(), "rendered graph data");
        Ok(BlockOutput::Graphs(graphs))
    }
}

//-----------------------------------------------------------------------------
// Helpers
//-----------------------------------------------------------------------------

fn title(row: &DataRow, excluded: &[&str]) -> String {
    let parts: Vec<String> = row
        .scenario
        .iter()
        .filter(|(k, _)| !excluded.contains(&k.as_str()))
        .map(|(k, v)| format!("{k} = {}", v.display()))
        .collect();
    if parts.is_empty() {
        "Graph".to_string()
    } else {
        parts.join(", ")
    }
}

fn scenario_label(row: &DataRow) -> String {
    row.scenario
        .values()
        .map(ScenarioCell::display)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numeric if every key is a number, by style index if every key is formatted,
/// otherwise case-insensitively.
fn sort_keys(keys: &mut [Key]) {
    let number = |k: &Key| k.raw.trim().parse::<f64>().ok();
    if keys.iter().all(|k| number(k).is_some()) {
        keys.sort_by(|a, b| {
            number(a)
                .zip(number(b))
                .map_or(Ordering::Equal, |(a, b)| a.total_cmp(&b))
        });
    } else if keys.iter().all(|k| k.index.is_some()) {
        keys.sort_by_key(|k| k.index);
    } else {
        keys.sort_by_key(|k| k.display.to_lowercase());
    }
}

fn column_stats<'a>(cells: impl Iterator<Item = &'a Value>) -> ColumnStats {
    let values: Vec<f64> = cells.map(Value::value).collect();
    if values.is_empty() {
        return ColumnStats {
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            geomean: f64::NAN,
            count: 0,
        };
    }
    ColumnStats {
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        mean: values.iter().sum::<f64>() / values.len() as f64,
        geomean: geomean(&values),
        count: values.len(),
    }
}

/// Every column is written as value, lower bound, upper bound, followed by
/// one line per column statistic.
fn render_csv(
    row_header: &str,
    columns: &[String],
    rows: &[GraphRow],
    stats: &[ColumnStats],
    confidence: f64,
) -> Result<String, csv::Error> {
    let pct = confidence * 100.0;
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![row_header.to_string()];
    for c in columns {
        header.push(c.clone());
        header.push(format!("{c}.{pct:.1}%-CI.lowerBound"));
        header.push(format!("{c}.{pct:.1}%-CI.upperBound"));
    }
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.key.clone()];
        for cell in &row.cells {
            match cell {
                Some(v) => record.extend(present_value_csv(v, true)),
                None => record.extend([String::new(), String::new(), String::new()]),
            }
        }
        writer.write_record(&record)?;
    }

    let stat_rows: [(&str, fn(&ColumnStats) -> f64); 4] = [
        ("min", |s| s.min),
        ("max", |s| s.max),
        ("mean", |s| s.mean),
        ("geomean", |s| s.geomean),
    ];
    for (name, get) in stat_rows {
        let mut record = vec![name.to_string()];
        for s in stats {
            let v = format_float(get(s));
            record.extend([v.clone(), v.clone(), v]);
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
