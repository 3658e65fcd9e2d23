use crate::block::{BlockDecodeError, BlockError};
use crate::pipeline::PipelineOutput;
use crate::pipeline::expr::ExprError;
use crate::source::SourceError;
use std::path::PathBuf;
use thiserror::Error;

/// Why an encoded pipeline was rejected.
#[derive(Debug, Error)]
pub enum DecodeErrorKind {
    #[error("expected 'flags|header|blocks', found {parts} part(s)")]
    Parts { parts: usize },

    #[error("header must have four '&'-separated groups, found {groups}")]
    Header { groups: usize },

    #[error("invalid flag word '{value}'")]
    Flags {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid derived value '{text}'")]
    Derived {
        text: String,
        #[source]
        source: ExprError,
    },

    #[error("invalid block {index}")]
    Block {
        index: usize,
        #[source]
        source: BlockDecodeError,
    },
}

#[derive(Debug, Error)]
#[error("failed to decode pipeline '{input}': {kind}")]
pub struct DecodeError {
    pub input: String,
    #[source]
    pub kind: DecodeErrorKind,
}

/// A block could not decide between several equally valid rows.
///
/// `recovered` holds the pipeline's output up to, but excluding, that block.
#[derive(Debug)]
pub struct Ambiguity {
    pub block: usize,
    pub message: String,
    pub recovered: PipelineOutput,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    //-------------------------------------------------------------------------
    // Structural
    //-------------------------------------------------------------------------
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("the pipeline selects no logs")]
    NoLogs,

    #[error("failed to load logs: {0}")]
    Load(#[from] SourceError),

    #[error("block {index} ({name}) failed: {source}")]
    Block {
        index: usize,
        name: &'static str,
        #[source]
        source: BlockError,
    },

    //-------------------------------------------------------------------------
    // Recoverable
    //-------------------------------------------------------------------------
    #[error("block {} is ambiguous: {}", .0.block, .0.message)]
    Ambiguity(Box<Ambiguity>),

    #[error("log {log} is being tabulated by process {pid}")]
    TabulationInProgress {
        log: String,
        pid: u32,
        status_file: PathBuf,
    },
}

impl PipelineError {
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Ambiguity(_) | Self::TabulationInProgress { .. }
        )
    }
}
