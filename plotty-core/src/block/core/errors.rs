use crate::style::StyleError;
use thiserror::Error;

/// Failure while applying a block to a table.
#[derive(Debug, Error)]
pub enum BlockError {
    //-------------------------------------------------------------------------
    // Structural
    //-------------------------------------------------------------------------
    #[error("unknown scenario column '{column}'")]
    UnknownScenarioColumn { column: String },

    #[error("unknown value column '{column}'")]
    UnknownValueColumn { column: String },

    #[error("invalid bound '{bound}' for value column '{column}'")]
    InvalidBound { column: String, bound: String },

    #[error("unknown format style '{key}'")]
    MissingStyle { key: String },

    #[error("failed to look up styles: {source}")]
    Style {
        #[from]
        source: StyleError,
    },

    #[error("failed to render graph data: {source}")]
    Render {
        #[from]
        source: csv::Error,
    },

    //-------------------------------------------------------------------------
    // Recoverable
    //-------------------------------------------------------------------------
    #[error("{message}")]
    Ambiguity { message: String },
}

impl BlockError {
    pub fn ambiguity(message: impl Into<String>) -> Self {
        Self::Ambiguity {
            message: message.into(),
        }
    }

    pub fn is_ambiguity(&self) -> bool {
        matches!(self, Self::Ambiguity { .. })
    }
}

/// A block's parameters could not be decoded.
#[derive(Debug, Error)]
pub enum BlockDecodeError {
    #[error("{block} block is missing its {what}")]
    Missing {
        block: &'static str,
        what: &'static str,
    },

    #[error("{block} block has an invalid {what} '{value}'")]
    Invalid {
        block: &'static str,
        what: &'static str,
        value: String,
    },

    #[error("unknown block type '{tag}'")]
    UnknownTag { tag: char },

    #[error("invalid flag word '{value}': {source}")]
    Flags {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

impl BlockDecodeError {
    pub fn missing(block: &'static str, what: &'static str) -> Self {
        Self::Missing { block, what }
    }

    pub fn invalid(block: &'static str, what: &'static str, value: impl Into<String>) -> Self {
        Self::Invalid {
            block,
            what,
            value: value.into(),
        }
    }
}
