use crate::block::builtin::filter::Comparison;
use crate::block::core::errors::{BlockDecodeError, BlockError};
use crate::block::core::{Block, BlockContext, BlockKind, BlockOutput, require_value_columns};
use crate::model::DataTable;
use crate::pipeline::encoding::{PARAM, TUPLE};
use serde::{Deserialize, Serialize};

/// An inclusive numeric range on one value column.
///
/// Bounds are kept as written and parsed when the block runs; an empty bound
/// leaves that side open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCondition {
    pub column: String,
    pub comparison: Comparison,
    pub lower: String,
    pub upper: String,
}

/// Keeps rows whose values fall inside (`is`) or outside (`is not`) each range.
///
/// Rows without the tested value never pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFilterBlock {
    pub flags: u32,
    pub conditions: Vec<ValueCondition>,
}

struct Range {
    lower: f64,
    upper: f64,
}

impl ValueCondition {
    fn range(&self) -> Result<Range, BlockError> {
        let parse = |bound: &str, open: f64| -> Result<f64, BlockError> {
            if bound.trim().is_empty() {
                return Ok(open);
            }
            bound
                .trim()
                .parse::<f64>()
                .map_err(|_| BlockError::InvalidBound {
                    column: self.column.clone(),
                    bound: bound.to_string(),
                })
        };

        Ok(Range {
            lower: parse(&self.lower, f64::NEG_INFINITY)?,
            upper: parse(&self.upper, f64::INFINITY)?,
        })
    }
}

impl Block for ValueFilterBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::ValueFilter
    }

    fn decode(flags: u32, groups: &[&str]) -> Result<Self, BlockDecodeError> {
        let conditions = groups
            .iter()
            .filter(|g| !g.is_empty())
            .map(|group| {
                let params: Vec<&str> = group.splitn(3, PARAM).collect();
                let [column, comparison, bounds] = params[..] else {
                    return Err(BlockDecodeError::invalid("value filter", "condition", *group));
                };
                let Some((lower, upper)) = bounds.split_once(TUPLE) else {
                    return Err(BlockDecodeError::invalid("value filter", "bounds", bounds));
                };
                if column.is_empty() {
                    return Err(BlockDecodeError::invalid("value filter", "condition", *group));
                }
                Ok(ValueCondition {
                    column: column.to_string(),
                    comparison: Comparison::decode("value filter", comparison)?,
                    lower: lower.to_string(),
                    upper: upper.to_string(),
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
            .map(|c| {
                format!(
                    "{}{PARAM}{}{PARAM}{}{TUPLE}{}",
                    c.column,
                    c.comparison.code(),
                    c.lower,
                    c.upper
                )
            })
            .collect()
    }

    fn apply(
        &self,
        table: &mut DataTable,
        _ctx: &BlockContext<'_>,
    ) -> Result<BlockOutput, BlockError> {
        let columns: Vec<&str> = self.conditions.iter().map(|c| c.column.as_str()).collect();
        require_value_columns(table, &columns)?;

        let ranges = self
            .conditions
            .iter()
            .map(|c| c.range().map(|r| (c, r)))
            .collect::<Result<Vec<_>, _>>()?;

        table.rows.retain(|row| {
            ranges.iter().all(|(c, r)| {
                let Some(value) = row.values.get(&c.column) else {
                    return false;
                };
                let v = value.value();
                let inside = v >= r.lower && v <= r.upper;
                match c.comparison {
                    Comparison::Is => inside,
                    Comparison::IsNot => !inside,
                }
            })
        });

        Ok(BlockOutput::Continue)
    }
}
