use crate::block::core::errors::{BlockDecodeError, BlockError};
use crate::block::core::{
    Block, BlockContext, BlockKind, BlockOutput, parse_type, require_scenario_columns,
    require_value_columns,
};
use crate::model::{DataRow, DataTable, Value};
use crate::pipeline::encoding::{PARAM, TUPLE};
use crate::util::fingerprint::{Columns, fingerprint};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Divide the baseline by each value instead of each value by the baseline.
pub const FLAG_INVERT: u32 = 1;

/// Divide every metric by the baseline's value of a single pinned column.
pub const FLAG_PIN: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeMode {
    /// The baseline is the row matching every selection.
    Select,
    /// The baseline of each metric is its smallest positive value.
    Best,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub column: String,
    pub value: String,
}

/// Expresses each row relative to a baseline found within its group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizeBlock {
    pub flags: u32,
    pub mode: NormalizeMode,
    pub pinned: Option<String>,
    pub selections: Vec<Selection>,
    pub group: Vec<String>,
}

/// What rows of one group are divided by.
enum Baseline {
    PerMetric(BTreeMap<String, Value>),
    Pinned(Value),
}

impl NormalizeBlock {
    fn invert(&self) -> bool {
        self.flags & FLAG_INVERT != 0
    }

    fn pinned_column(&self) -> Option<&str> {
        if self.flags & FLAG_PIN != 0 {
            self.pinned.as_deref()
        } else {
            None
        }
    }

    fn is_baseline(&self, row: &DataRow) -> bool {
        self.selections
            .iter()
            .all(|s| row.raw(&s.column) == Some(s.value.as_str()))
    }

    fn select_baseline(
        &self,
        rows: &[DataRow],
        members: &[usize],
    ) -> Result<Option<Baseline>, BlockError> {
        let mut found: Option<&DataRow> = None;
        for &n in members {
            let row = &rows[n];
            if !self.is_baseline(row) {
                continue;
            }
            if let Some(previous) = found {
                return Err(BlockError::ambiguity(format!(
                    "more than one baseline was found for the group {}: both {} and {} match; \
                     check the grouping columns of the normalization",
                    describe(row, &self.group),
                    describe_all(previous),
                    describe_all(row),
                )));
            }
            found = Some(row);
        }

        let Some(row) = found else {
            return Ok(None);
        };
        Ok(match self.pinned_column() {
            Some(pin) => row.values.get(pin).cloned().map(Baseline::Pinned),
            None => Some(Baseline::PerMetric(row.values.clone())),
        })
    }

    fn best_baseline(&self, rows: &[DataRow], members: &[usize]) -> Option<Baseline> {
        if let Some(pin) = self.pinned_column() {
            return members
                .iter()
                .filter_map(|&n| rows[n].values.get(pin))
                .filter(|v| v.value() > 0.0)
                .min_by(|a, b| a.value().total_cmp(&b.value()))
                .cloned()
                .map(Baseline::Pinned);
        }

        let mut best: BTreeMap<String, Value> = BTreeMap::new();
        for &n in members {
            for (metric, value) in &rows[n].values {
                let v = value.value();
                if v <= 0.0 || v.is_nan() {
                    continue;
                }
                let better = best.get(metric).is_none_or(|b| v < b.value());
                if better {
                    best.insert(metric.clone(), value.clone());
                }
            }
        }
        if best.is_empty() {
            None
        } else {
            Some(Baseline::PerMetric(best))
        }
    }

    fn normalize_row(&self, row: &mut DataRow, baseline: &Baseline) {
        let invert = self.invert();
        let divide = |value: &Value, base: &Value| {
            if invert {
                base.divide(value)
            } else {
                value.divide(base)
            }
        };

        let values = std::mem::take(&mut row.values);
        row.values = values
            .into_iter()
            .filter_map(|(metric, value)| {
                let base = match baseline {
                    Baseline::PerMetric(map) => map.get(&metric)?,
                    Baseline::Pinned(base) => base,
                };
                let normalized = divide(&value, base);
                Some((metric, normalized))
            })
            .collect();
    }
}

impl Block for NormalizeBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Normalize
    }

    fn decode(flags: u32, groups: &[&str]) -> Result<Self, BlockDecodeError> {
        let (ty, pinned) = parse_type("normalize", groups.first())?;
        let mode = match ty {
            1 => NormalizeMode::Select,
            2 => NormalizeMode::Best,
            other => {
                return Err(BlockDecodeError::invalid(
                    "normalize",
                    "type",
                    other.to_string(),
                ));
            }
        };
        if flags & FLAG_PIN != 0 && pinned.is_none() {
            return Err(BlockDecodeError::missing("normalize", "pinned column"));
        }

        let mut selections = Vec::new();
        let mut group = Vec::new();
        for part in groups.iter().skip(1).filter(|g| !g.is_empty()) {
            match part.split_once(PARAM) {
                Some((column, value)) if mode == NormalizeMode::Select && !column.is_empty() => {
                    selections.push(Selection {
                        column: column.to_string(),
                        value: value.to_string(),
                    });
                }
                Some(_) => return Err(BlockDecodeError::invalid("normalize", "group", *part)),
                None => group.push(part.to_string()),
            }
        }

        if mode == NormalizeMode::Select && selections.is_empty() {
            return Err(BlockDecodeError::missing("normalize", "baseline selection"));
        }

        Ok(Self {
            flags,
            mode,
            pinned,
            selections,
            group,
        })
    }

    fn flags(&self) -> u32 {
        self.flags
    }

    fn encode_params(&self) -> Vec<String> {
        let ty = match self.mode {
            NormalizeMode::Select => "1",
            NormalizeMode::Best => "2",
        };
        let head = match &self.pinned {
            Some(pin) => format!("{ty}{TUPLE}{pin}"),
            None => ty.to_string(),
        };

        std::iter::once(head)
            .chain(
                self.selections
                    .iter()
                    .map(|s| format!("{}{PARAM}{}", s.column, s.value)),
            )
            .chain(self.group.iter().cloned())
            .collect()
    }

    fn apply(
        &self,
        table: &mut DataTable,
        _ctx: &BlockContext<'_>,
    ) -> Result<BlockOutput, BlockError> {
        require_scenario_columns(table, &self.group)?;
        let selected: Vec<&str> = self.selections.iter().map(|s| s.column.as_str()).collect();
        require_scenario_columns(table, &selected)?;
        if let Some(pin) = self.pinned_column() {
            require_value_columns(table, &[pin])?;
        }

        let before = table.len();
        table.rows.retain(|row| row.has_all(&self.group));
        let ungrouped = before - table.len();
        if ungrouped > 0 {
            table.messages.info(
                "Normalize",
                format!(
                    "{ungrouped} row(s) were missing a grouping column and were dropped"
                ),
            );
        }

        if self.mode == NormalizeMode::Select {
            let before = table.len();
            table
                .rows
                .retain(|row| selected.iter().all(|c| row.scenario.contains_key(*c)));
            let unselectable = before - table.len();
            if unselectable > 0 {
                table.messages.info(
                    "Normalize",
                    format!(
                        "{unselectable} row(s) were missing a baseline selection column and \
                         were dropped"
                    ),
                );
            }
        }

        let mut index: AHashMap<String, usize> = AHashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (n, row) in table.rows.iter().enumerate() {
            let key = fingerprint(&row.scenario, Columns::Include(&self.group));
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(n);
        }

        let mut baselines = Vec::with_capacity(groups.len());
        for members in &groups {
            let baseline = match self.mode {
                NormalizeMode::Select => self.select_baseline(&table.rows, members)?,
                NormalizeMode::Best => self.best_baseline(&table.rows, members),
            };
            baselines.push(baseline);
        }

        let mut rows: Vec<Option<DataRow>> =
            std::mem::take(&mut table.rows).into_iter().map(Some).collect();
        let mut orphaned = 0;
        for (members, baseline) in groups.iter().zip(&baselines) {
            match baseline {
                Some(baseline) => {
                    for &n in members {
                        if let Some(row) = rows[n].as_mut() {
                            self.normalize_row(row, baseline);
                        }
                    }
                }
                None => {
                    for &n in members {
                        rows[n] = None;
                        orphaned += 1;
                    }
                }
            }
        }
        table.rows = rows.into_iter().flatten().collect();

        if orphaned > 0 {
            table.messages.info(
                "Normalize",
                format!("{orphaned} row(s) had no baseline in their group and were dropped"),
            );
        }

        Ok(BlockOutput::Continue)
    }
}

fn describe(row: &DataRow, columns: &[String]) -> String {
    if columns.is_empty() {
        return "(all rows)".to_string();
    }
    columns
        .iter()
        .map(|c| format!("{c} = {}", row.raw(c).unwrap_or("")))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_all(row: &DataRow) -> String {
    let text = row
        .scenario
        .iter()
        .map(|(k, v)| format!("{k} = {}", v.raw()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("({text})")
}
