use super::errors::BlockError;
use super::{Block, BlockContext, BlockKind, BlockOutput};
use crate::block::builtin::aggregate::AggregateBlock;
use crate::block::builtin::composite::CompositeScenarioBlock;
use crate::block::builtin::filter::FilterBlock;
use crate::block::builtin::format::FormatBlock;
use crate::block::builtin::graph::GraphBlock;
use crate::block::builtin::normalize::NormalizeBlock;
use crate::block::builtin::value_filter::ValueFilterBlock;
use crate::model::DataTable;
use crate::pipeline::encoding::GROUP;
use serde::{Deserialize, Serialize};

/// A decoded block of any builtin kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum BlockSpec {
    Filter(FilterBlock),
    Aggregate(AggregateBlock),
    Normalize(NormalizeBlock),
    Graph(GraphBlock),
    ValueFilter(ValueFilterBlock),
    CompositeScenario(CompositeScenarioBlock),
    Format(FormatBlock),
}

impl BlockSpec {
    pub fn as_block(&self) -> &dyn Block {
        match self {
            BlockSpec::Filter(b) => b,
            BlockSpec::Aggregate(b) => b,
            BlockSpec::Normalize(b) => b,
            BlockSpec::Graph(b) => b,
            BlockSpec::ValueFilter(b) => b,
            BlockSpec::CompositeScenario(b) => b,
            BlockSpec::Format(b) => b,
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.as_block().kind()
    }

    /// Canonical text of the block: tag, flag word, then `&`-prefixed groups.
    pub fn encode(&self) -> String {
        let block = self.as_block();
        let mut out = format!("{}{}", block.kind().tag(), block.flags());
        for group in block.encode_params() {
            out.push(GROUP);
            out.push_str(&group);
        }
        out
    }

    pub fn apply(
        &self,
        table: &mut DataTable,
        ctx: &BlockContext<'_>,
    ) -> Result<BlockOutput, BlockError> {
        let block = self.as_block();
        tracing::debug!(block = %block.kind(), rows = table.len(), "applying block");
        block.apply(table, ctx)
    }
}
