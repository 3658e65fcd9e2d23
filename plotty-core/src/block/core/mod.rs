pub mod errors;
pub mod registry;
pub mod result;
pub mod spec;

use self::errors::{BlockDecodeError, BlockError};
pub use self::result::BlockOutput;
use crate::model::DataTable;
use crate::style::StyleStore;
use std::fmt::{Display, Formatter};

/// The seven stages a pipeline can be built from, with their one-character tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Filter,
    Aggregate,
    Normalize,
    Graph,
    ValueFilter,
    CompositeScenario,
    Format,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Filter,
        BlockKind::Aggregate,
        BlockKind::Normalize,
        BlockKind::Graph,
        BlockKind::ValueFilter,
        BlockKind::CompositeScenario,
        BlockKind::Format,
    ];

    pub fn tag(&self) -> char {
        match self {
            BlockKind::Filter => '1',
            BlockKind::Aggregate => '2',
            BlockKind::Normalize => '3',
            BlockKind::Graph => '4',
            BlockKind::ValueFilter => '5',
            BlockKind::CompositeScenario => '6',
            BlockKind::Format => '7',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Filter => "filter",
            BlockKind::Aggregate => "aggregate",
            BlockKind::Normalize => "normalize",
            BlockKind::Graph => "graph",
            BlockKind::ValueFilter => "value filter",
            BlockKind::CompositeScenario => "composite scenario",
            BlockKind::Format => "format",
        }
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What a block may consult besides the table it transforms.
pub struct BlockContext<'a> {
    pub styles: &'a dyn StyleStore,
    pub confidence: f64,
}

/// A single transformation stage.
///
/// Blocks mutate the shared table in place. Column references are checked
/// against the table's declared columns before anything is touched, so a
/// structural error leaves the table as the previous block left it.
pub trait Block {
    fn kind(&self) -> BlockKind;

    /// Builds the block from its flag word and `&`-separated parameter groups.
    fn decode(flags: u32, groups: &[&str]) -> Result<Self, BlockDecodeError>
    where
        Self: Sized;

    fn flags(&self) -> u32 {
        0
    }

    /// Parameter groups in the same form [`Block::decode`] accepts.
    fn encode_params(&self) -> Vec<String>;

    fn apply(
        &self,
        table: &mut DataTable,
        ctx: &BlockContext<'_>,
    ) -> Result<BlockOutput, BlockError>;
}

//-----------------------------------------------------------------------------
// Column checks shared by the builtin blocks
//-----------------------------------------------------------------------------

pub fn require_scenario_columns<S: AsRef<str>>(
    table: &DataTable,
    columns: &[S],
) -> Result<(), BlockError> {
    for column in columns {
        if !table.scenario_columns.contains(column.as_ref()) {
            return Err(BlockError::UnknownScenarioColumn {
                column: column.as_ref().to_string(),
            });
        }
    }
    Ok(())
}

pub fn require_value_columns<S: AsRef<str>>(
    table: &DataTable,
    columns: &[S],
) -> Result<(), BlockError> {
    for column in columns {
        if !table.value_columns.contains(column.as_ref()) {
            return Err(BlockError::UnknownValueColumn {
                column: column.as_ref().to_string(),
            });
        }
    }
    Ok(())
}

/// Reads a numeric type group such as `1` or `2;bmtime`.
pub fn parse_type(
    block: &'static str,
    group: Option<&&str>,
) -> Result<(u32, Option<String>), BlockDecodeError> {
    let group = group
        .filter(|g| !g.is_empty())
        .ok_or_else(|| BlockDecodeError::missing(block, "type"))?;

    let mut parts = group.splitn(2, crate::pipeline::encoding::TUPLE);
    let ty = parts.next().unwrap_or_default();
    let ty = ty
        .parse::<u32>()
        .map_err(|_| BlockDecodeError::invalid(block, "type", ty))?;
    let extra = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    Ok((ty, extra))
}
