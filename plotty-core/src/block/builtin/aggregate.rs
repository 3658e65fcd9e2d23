use crate::block::core::errors::{BlockDecodeError, BlockError};
use crate::block::core::{
    Block, BlockContext, BlockKind, BlockOutput, parse_type, require_scenario_columns,
};
use crate::model::{AggregateKind, DataAggregate, DataRow, DataTable, Value};
use crate::util::fingerprint::{Columns, fingerprint, fingerprint_all};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keep the original rows and attach each group's aggregate to them.
pub const FLAG_KEEP_ROWS: u32 = 1;

/// Collapses rows that differ only in `column` into one row of aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBlock {
    pub flags: u32,
    pub kind: AggregateKind,
    pub column: String,
}

impl AggregateBlock {
    fn keep_rows(&self) -> bool {
        self.flags & FLAG_KEEP_ROWS != 0
    }

    fn kind_code(&self) -> &'static str {
        match self.kind {
            AggregateKind::Mean => "1",
            AggregateKind::Geomean => "2",
        }
    }
}

struct Group {
    members: Vec<usize>,
}

impl Block for AggregateBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Aggregate
    }

    fn decode(flags: u32, groups: &[&str]) -> Result<Self, BlockDecodeError> {
        let (ty, _) = parse_type("aggregate", groups.first())?;
        let kind = match ty {
            1 => AggregateKind::Mean,
            2 => AggregateKind::Geomean,
            other => {
                return Err(BlockDecodeError::invalid(
                    "aggregate",
                    "type",
                    other.to_string(),
                ));
            }
        };
        let column = groups
            .get(1)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| BlockDecodeError::missing("aggregate", "column"))?;

        Ok(Self {
            flags,
            kind,
            column: column.to_string(),
        })
    }

    fn flags(&self) -> u32 {
        self.flags
    }

    fn encode_params(&self) -> Vec<String> {
        vec![self.kind_code().to_string(), self.column.clone()]
    }

    fn apply(
        &self,
        table: &mut DataTable,
        ctx: &BlockContext<'_>,
    ) -> Result<BlockOutput, BlockError> {
        require_scenario_columns(table, &[&self.column])?;

        let mut seen: AHashSet<String> = AHashSet::new();
        for row in table.rows.iter().filter(|r| r.scenario.contains_key(&self.column)) {
            if !seen.insert(fingerprint_all(&row.scenario)) {
                return Err(BlockError::ambiguity(format!(
                    "more than one row has the scenario {}; add a filter or aggregate over \
                     another column first",
                    describe(row)
                )));
            }
        }

        let before = table.len();
        table
            .rows
            .retain(|row| row.scenario.contains_key(&self.column));
        let dropped = before - table.len();
        if dropped > 0 {
            table.messages.info(
                "Aggregate",
                format!(
                    "{dropped} row(s) without a value for '{}' were not aggregated",
                    self.column
                ),
            );
        }

        // Groups in order of first appearance.
        let excluded = [self.column.as_str()];
        let mut index: AHashMap<String, usize> = AHashMap::new();
        let mut groups: Vec<Group> = Vec::new();
        for (n, row) in table.rows.iter().enumerate() {
            let key = fingerprint(&row.scenario, Columns::Exclude(&excluded));
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Group {
                    members: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].members.push(n);
        }

        let aggregates: Vec<BTreeMap<String, DataAggregate>> = groups
            .iter()
            .map(|g| self.collapse(&table.rows, &g.members, ctx.confidence))
            .collect();

        if self.keep_rows() {
            let mut added = Vec::new();
            for (group, aggs) in groups.iter().zip(aggregates) {
                for (metric, agg) in aggs {
                    let name = format!("{metric}.{}", self.kind);
                    for &n in &group.members {
                        table.rows[n]
                            .values
                            .insert(name.clone(), Value::Aggregate(agg.clone()));
                    }
                    added.push(name);
                }
            }
            table.value_columns.extend(added);
        } else {
            let rows = std::mem::take(&mut table.rows);
            table.rows = groups
                .iter()
                .zip(aggregates)
                .map(|(group, aggs)| {
                    let mut scenario = rows[group.members[0]].scenario.clone();
                    scenario.remove(&self.column);
                    DataRow {
                        scenario,
                        values: aggs
                            .into_iter()
                            .map(|(k, v)| (k, Value::Aggregate(v)))
                            .collect(),
                    }
                })
                .collect();
            table.scenario_columns.remove(&self.column);
        }

        tracing::debug!(
            column = %self.column,
            kind = %self.kind,
            groups = groups.len(),
            "aggregated rows"
        );
        Ok(BlockOutput::Continue)
    }
}

impl AggregateBlock {
    fn collapse(
        &self,
        rows: &[DataRow],
        members: &[usize],
        confidence: f64,
    ) -> BTreeMap<String, DataAggregate> {
        let mut out: BTreeMap<String, DataAggregate> = BTreeMap::new();
        for &n in members {
            for (metric, value) in &rows[n].values {
                out.entry(metric.clone())
                    .or_insert_with(|| DataAggregate::new(self.kind, confidence))
                    .push(value.value());
            }
        }
        out
    }
}

fn describe(row: &DataRow) -> String {
    row.scenario
        .iter()
        .map(|(k, v)| format!("{k} = {}", v.raw()))
        .collect::<Vec<_>>()
        .join(", ")
}
