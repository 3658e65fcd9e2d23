use super::errors::BlockDecodeError;
use super::spec::BlockSpec;
use super::{Block, BlockKind};
use crate::block::builtin::aggregate::AggregateBlock;
use crate::block::builtin::composite::CompositeScenarioBlock;
use crate::block::builtin::filter::FilterBlock;
use crate::block::builtin::format::FormatBlock;
use crate::block::builtin::graph::GraphBlock;
use crate::block::builtin::normalize::NormalizeBlock;
use crate::block::builtin::value_filter::ValueFilterBlock;
use crate::pipeline::encoding::{GROUP, split_groups};
use std::collections::HashMap;

type BlockDecoder = fn(u32, &[&str]) -> Result<BlockSpec, BlockDecodeError>;

fn decode_filter(flags: u32, groups: &[&str]) -> Result<BlockSpec, BlockDecodeError> {
    Ok(BlockSpec::Filter(FilterBlock::decode(flags, groups)?))
}

fn decode_aggregate(flags: u32, groups: &[&str]) -> Result<BlockSpec, BlockDecodeError> {
    Ok(BlockSpec::Aggregate(AggregateBlock::decode(flags, groups)?))
}

fn decode_normalize(flags: u32, groups: &[&str]) -> Result<BlockSpec, BlockDecodeError> {
    Ok(BlockSpec::Normalize(NormalizeBlock::decode(flags, groups)?))
}

fn decode_graph(flags: u32, groups: &[&str]) -> Result<BlockSpec, BlockDecodeError> {
    Ok(BlockSpec::Graph(GraphBlock::decode(flags, groups)?))
}

fn decode_value_filter(flags: u32, groups: &[&str]) -> Result<BlockSpec, BlockDecodeError> {
    Ok(BlockSpec::ValueFilter(ValueFilterBlock::decode(
        flags, groups,
    )?))
}

fn decode_composite(flags: u32, groups: &[&str]) -> Result<BlockSpec, BlockDecodeError> {
    Ok(BlockSpec::CompositeScenario(CompositeScenarioBlock::decode(
        flags, groups,
    )?))
}

fn decode_format(flags: u32, groups: &[&str]) -> Result<BlockSpec, BlockDecodeError> {
    Ok(BlockSpec::Format(FormatBlock::decode(flags, groups)?))
}

fn builtin_decoders() -> HashMap<char, BlockDecoder> {
    let mut map = HashMap::new();

    for kind in BlockKind::ALL {
        let decoder = match kind {
            BlockKind::Filter => decode_filter as BlockDecoder,
            BlockKind::Aggregate => decode_aggregate,
            BlockKind::Normalize => decode_normalize,
            BlockKind::Graph => decode_graph,
            BlockKind::ValueFilter => decode_value_filter,
            BlockKind::CompositeScenario => decode_composite,
            BlockKind::Format => decode_format,
        };
        map.insert(kind.tag(), decoder);
    }

    map
}

/// Looks blocks up by their one-character tag.
pub struct BlockRegistry {
    decoders: HashMap<char, BlockDecoder>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            decoders: builtin_decoders(),
        }
    }

    /// Decodes one `|`-separated block segment, e.g. `12&1&invocation`.
    pub fn decode(&self, text: &str) -> Result<BlockSpec, BlockDecodeError> {
        let mut chars = text.chars();
        let tag = chars
            .next()
            .ok_or_else(|| BlockDecodeError::missing("pipeline", "block tag"))?;
        let decoder = self
            .decoders
            .get(&tag)
            .ok_or(BlockDecodeError::UnknownTag { tag })?;

        let rest = chars.as_str();
        let (flag_text, params) = match rest.split_once(GROUP) {
            Some((flags, params)) => (flags, Some(params)),
            None => (rest, None),
        };

        let flags = if flag_text.is_empty() {
            0
        } else {
            flag_text
                .parse::<u32>()
                .map_err(|source| BlockDecodeError::Flags {
                    value: flag_text.to_string(),
                    source,
                })?
        };

        let groups = params.map(split_groups).unwrap_or_default();
        decoder(flags, &groups)
    }
}
