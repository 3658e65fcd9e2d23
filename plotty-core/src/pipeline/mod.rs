pub mod encoding;
mod engine;
mod error;
pub mod expr;


pub use engine::{CACHE_FORMAT_VERSION, Engine, tabulation_status};
pub use error::{Ambiguity, DecodeError, DecodeErrorKind, PipelineError};

use crate::block::{BlockRegistry, BlockSpec, GraphOutput};
use crate::model::DataTable;
use encoding::{BLOCK, GROUP, join_params, split_groups, split_params};
use expr::{Expr, ExprError};
use serde::{Deserialize, Serialize, Serializer};

/// A computed value column; its expression text doubles as the column name.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedValue {
    pub text: String,
    pub expr: Expr,
}

impl DerivedValue {
    pub fn parse(text: &str) -> Result<Self, ExprError> {
        Ok(Self {
            text: text.to_string(),
            expr: Expr::parse(text)?,
        })
    }
}

impl Serialize for DerivedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

/// A decoded pipeline: which logs to load, how to trim them, and the blocks to run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pipeline {
    pub flags: u32,
    pub logs: Vec<String>,
    pub scenario_columns: Vec<String>,
    pub value_columns: Vec<String>,
    pub derived: Vec<DerivedValue>,
    pub blocks: Vec<BlockSpec>,
}

/// What running a pipeline (or a prefix of one) produces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub table: DataTable,
    pub graphs: Vec<GraphOutput>,
}

impl Pipeline {
    /// Decodes `flags|logs&scenarios&values&derived|block|block...`.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        Self::decode_inner(text).map_err(|kind| DecodeError {
            input: text.to_string(),
            kind,
        })
    }

    fn decode_inner(text: &str) -> Result<Self, DecodeErrorKind> {
        let parts: Vec<&str> = text.split(BLOCK).collect();
        let [flag_text, header, blocks @ ..] = parts.as_slice() else {
            return Err(DecodeErrorKind::Parts { parts: parts.len() });
        };

        let flags = flag_text
            .trim()
            .parse::<u32>()
            .map_err(|source| DecodeErrorKind::Flags {
                value: flag_text.to_string(),
                source,
            })?;

        let groups = split_groups(header);
        let [logs, scenarios, values, derived] = groups.as_slice() else {
            return Err(DecodeErrorKind::Header {
                groups: groups.len(),
            });
        };

        let owned = |text: &str| -> Vec<String> {
            split_params(text).into_iter().map(str::to_string).collect()
        };
        let value_columns = owned(values);

        let derived = split_params(derived)
            .into_iter()
            .map(|text| {
                let value = DerivedValue::parse(text).map_err(|source| {
                    DecodeErrorKind::Derived {
                        text: text.to_string(),
                        source,
                    }
                })?;
                check_identifiers(&value, &value_columns)?;
                Ok(value)
            })
            .collect::<Result<Vec<_>, DecodeErrorKind>>()?;

        let registry = BlockRegistry::new();
        let blocks = blocks
            .iter()
            .filter(|b| !b.is_empty())
            .enumerate()
            .map(|(index, b)| {
                registry
                    .decode(b)
                    .map_err(|source| DecodeErrorKind::Block { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            flags,
            logs: owned(logs),
            scenario_columns: owned(scenarios),
            value_columns,
            derived,
            blocks,
        })
    }

    pub fn encode(&self) -> String {
        let mut out = self.header_key();
        for block in &self.blocks {
            out.push(BLOCK);
            out.push_str(&block.encode());
        }
        out
    }

    fn header_key(&self) -> String {
        let derived: Vec<&str> = self.derived.iter().map(|d| d.text.as_str()).collect();
        format!(
            "{flags}{BLOCK}{logs}{GROUP}{scenarios}{GROUP}{values}{GROUP}{derived}",
            flags = self.flags,
            logs = join_params(&self.logs),
            scenarios = join_params(&self.scenario_columns),
            values = join_params(&self.value_columns),
            derived = join_params(&derived),
        )
    }

    /// Encoded prefixes of every stage: index 0 is the header alone, index
    /// `i + 1` runs through block `i`.
    pub fn stage_keys(&self) -> Vec<String> {
        let mut key = self.header_key();
        let mut keys = vec![key.clone()];
        for block in &self.blocks {
            key.push(BLOCK);
            key.push_str(&block.encode());
            keys.push(key.clone());
        }
        keys
    }

    /// The same pipeline keeping only its first `blocks` blocks.
    pub fn truncated(&self, blocks: usize) -> Pipeline {
        Pipeline {
            blocks: self.blocks.iter().take(blocks).cloned().collect(),
            ..self.clone()
        }
    }
}

/// Derived values may only read value columns the header selects.
///
/// An empty value selection keeps every column, so nothing can be checked up front.
fn check_identifiers(value: &DerivedValue, selected: &[String]) -> Result<(), DecodeErrorKind> {
    if selected.is_empty() {
        return Ok(());
    }
    match value
        .expr
        .identifiers()
        .into_iter()
        .find(|name| !selected.iter().any(|s| s == name))
    {
        Some(name) => Err(DecodeErrorKind::Derived {
            text: value.text.clone(),
            source: ExprError::UnknownIdentifier {
                name: name.to_string(),
            },
        }),
        None => Ok(()),
    }
}
