use crate::block::core::errors::{BlockDecodeError, BlockError};
use crate::block::core::{Block, BlockContext, BlockKind, BlockOutput, require_scenario_columns};
use crate::model::DataTable;
use crate::pipeline::encoding::PARAM;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Is,
    IsNot,
}

impl Comparison {
    pub fn decode(block: &'static str, code: &str) -> Result<Self, BlockDecodeError> {
        match code {
            "1" => Ok(Comparison::Is),
            "2" => Ok(Comparison::IsNot),
            other => Err(BlockDecodeError::invalid(block, "comparison", other)),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Comparison::Is => "1",
            Comparison::IsNot => "2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub column: String,
    pub comparison: Comparison,
    pub value: String,
}

/// Keeps rows whose scenario satisfies every condition.
///
/// Columns tested with `is` hold a single value afterwards and are removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterBlock {
    pub flags: u32,
    pub conditions: Vec<FilterCondition>,
}

impl FilterCondition {
    fn matches(&self, raw: Option<&str>) -> bool {
        match (self.comparison, raw) {
            (Comparison::Is, Some(v)) => v == self.value,
            (Comparison::Is, None) => false,
            (Comparison::IsNot, Some(v)) => v != self.value,
            (Comparison::IsNot, None) => true,
        }
    }
}

impl Block for FilterBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Filter
    }

    fn decode(flags: u32, groups: &[&str]) -> Result<Self, BlockDecodeError> {
        let conditions = groups
            .iter()
            .filter(|g| !g.is_empty())
            .map(|group| {
                let params: Vec<&str> = group.splitn(3, PARAM).collect();
                let [column, comparison, value] = params[..] else {
                    return Err(BlockDecodeError::invalid("filter", "condition", *group));
                };
                if column.is_empty() {
                    return Err(BlockDecodeError::invalid("filter", "condition", *group));
                }
                Ok(FilterCondition {
                    column: column.to_string(),
                    comparison: Comparison::decode("filter", comparison)?,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { flags, conditions })
    }

    fn flags(&self) -> u32 {
        self.flags
    }

    fn encode_params(&self) -> Vec<String> {
        self.conditions
            .iter()
            .map(|c| format!("{}{PARAM}{}{PARAM}{}", c.column, c.comparison.code(), c.value))
            .collect()
    }

    fn apply(
        &self,
        table: &mut DataTable,
        _ctx: &BlockContext<'_>,
    ) -> Result<BlockOutput, BlockError> {
        let columns: Vec<&str> = self.conditions.iter().map(|c| c.column.as_str()).collect();
        require_scenario_columns(table, &columns)?;

        let before = table.len();
        table.rows.retain(|row| {
            self.conditions
                .iter()
                .all(|c| c.matches(row.raw(&c.column)))
        });

        let fixed: Vec<&String> = self
            .conditions
            .iter()
            .filter(|c| c.comparison == Comparison::Is)
            .map(|c| &c.column)
            .collect();
        for row in &mut table.rows {
            row.scenario.retain(|k, _| !fixed.contains(&k));
        }
        for column in fixed {
            table.scenario_columns.remove(column);
        }

        tracing::debug!(before, after = table.len(), "filter applied");
        Ok(BlockOutput::Continue)
    }
}

