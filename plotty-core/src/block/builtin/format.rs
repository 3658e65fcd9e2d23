use crate::block::core::errors::{BlockDecodeError, BlockError};
use crate::block::core::{Block, BlockContext, BlockKind, BlockOutput, require_scenario_columns};
use crate::model::{DataTable, ScenarioCell, ScenarioValue};
use crate::style::FormatStyleEntry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Format value-column headers instead of the values of a scenario column.
pub const FLAG_VALUE_HEADERS: u32 = 1;

/// Replaces raw scenario values with the display entries of a format style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatBlock {
    pub flags: u32,
    pub style: String,
    pub column: Option<String>,
}

impl FormatBlock {
    fn value_headers(&self) -> bool {
        self.flags & FLAG_VALUE_HEADERS != 0
    }

    fn entries(&self, ctx: &BlockContext<'_>) -> Result<Vec<FormatStyleEntry>, BlockError> {
        ctx.styles
            .format_style(&self.style)?
            .ok_or_else(|| BlockError::MissingStyle {
                key: self.style.clone(),
            })
    }
}

impl Block for FormatBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Format
    }

    fn decode(flags: u32, groups: &[&str]) -> Result<Self, BlockDecodeError> {
        let style = groups
            .first()
            .filter(|g| !g.is_empty())
            .ok_or_else(|| BlockDecodeError::missing("format", "style key"))?
            .to_string();
        let column = groups
            .get(1)
            .filter(|g| !g.is_empty())
            .map(|g| g.to_string());

        if flags & FLAG_VALUE_HEADERS == 0 && column.is_none() {
            return Err(BlockDecodeError::missing("format", "column"));
        }

        Ok(Self {
            flags,
            style,
            column,
        })
    }

    fn flags(&self) -> u32 {
        self.flags
    }

    fn encode_params(&self) -> Vec<String> {
        let mut out = vec![self.style.clone()];
        out.extend(self.column.clone());
        out
    }

    fn apply(
        &self,
        table: &mut DataTable,
        ctx: &BlockContext<'_>,
    ) -> Result<BlockOutput, BlockError> {
        let column = if self.value_headers() {
            None
        } else {
            let column = self.column.as_deref().unwrap_or_default();
            require_scenario_columns(table, &[column])?;
            Some(column)
        };

        let entries = self.entries(ctx)?;

        let Some(column) = column else {
            for entry in entries {
                if table.value_columns.contains(&entry.value) {
                    table.value_labels.insert(entry.value, entry.display);
                }
            }
            return Ok(BlockOutput::Continue);
        };

        let lookup: HashMap<&str, ScenarioValue> = entries
            .iter()
            .enumerate()
            .map(|(pos, e)| {
                (
                    e.value.as_str(),
                    ScenarioValue {
                        value: e.value.clone(),
                        display: e.display.clone(),
                        index: e.index.unwrap_or(pos as i64),
                        group: e.group.clone(),
                        color: e.color.clone(),
                    },
                )
            })
            .collect();

        let mut unmatched: BTreeSet<String> = BTreeSet::new();
        for row in &mut table.rows {
            let Some(cell) = row.scenario.get_mut(column) else {
                continue;
            };
            match lookup.get(cell.raw()) {
                Some(styled) => *cell = ScenarioCell::Styled(styled.clone()),
                None => {
                    unmatched.insert(cell.raw().to_string());
                }
            }
        }

        for raw in unmatched {
            table.messages.warn(
                "Format",
                format!(
                    "style '{}' has no entry for {column} = {raw}; it was left unformatted",
                    self.style
                ),
            );
        }

        Ok(BlockOutput::Continue)
    }
}
