use crate::block::core::errors::{BlockDecodeError, BlockError};
use crate::block::core::{Block, BlockContext, BlockKind, BlockOutput, require_scenario_columns};
use crate::model::{DataTable, ScenarioCell};
use crate::pipeline::encoding::{join_params, split_params};
use serde::{Deserialize, Serialize};

/// Collapses several scenario columns into one named after them.
///
/// `benchmark` and `heap` become `benchmark-heap`, holding `fop-64` and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScenarioBlock {
    pub flags: u32,
    pub columns: Vec<String>,
}

impl CompositeScenarioBlock {
    pub fn column_name(&self) -> String {
        self.columns.join("-")
    }
}

impl Block for CompositeScenarioBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::CompositeScenario
    }

    fn decode(flags: u32, groups: &[&str]) -> Result<Self, BlockDecodeError> {
        let group = groups
            .first()
            .ok_or_else(|| BlockDecodeError::missing("composite scenario", "columns"))?;
        let columns: Vec<String> = split_params(group).into_iter().map(str::to_string).collect();
        if columns.len() < 2 {
            return Err(BlockDecodeError::invalid(
                "composite scenario",
                "column list",
                *group,
            ));
        }
        Ok(Self { flags, columns })
    }

    fn flags(&self) -> u32 {
        self.flags
    }

    fn encode_params(&self) -> Vec<String> {
        vec![join_params(&self.columns)]
    }

    fn apply(
        &self,
        table: &mut DataTable,
        _ctx: &BlockContext<'_>,
    ) -> Result<BlockOutput, BlockError> {
        require_scenario_columns(table, &self.columns)?;

        let name = self.column_name();
        let before = table.len();
        table.rows.retain(|row| row.has_all(&self.columns));
        let dropped = before - table.len();

        for row in &mut table.rows {
            let joined = self
                .columns
                .iter()
                .filter_map(|c| row.scenario.remove(c))
                .map(|cell| cell.raw().to_string())
                .collect::<Vec<_>>()
                .join("-");
            row.scenario.insert(name.clone(), ScenarioCell::Raw(joined));
        }

        for column in &self.columns {
            table.scenario_columns.remove(column);
        }
        table.scenario_columns.insert(name.clone());

        if dropped > 0 {
            table.messages.info(
                "Composite scenario",
                format!("{dropped} row(s) were missing a column of '{name}' and were dropped"),
            );
        }

        Ok(BlockOutput::Continue)
    }
}
