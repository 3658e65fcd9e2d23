use crate::style::StyleError;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("graph template contains '{pattern}', which could escape to a shell")]
    UnsafeTemplate { pattern: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run plotter {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("plotter {program} exited with {status}")]
    Failed { program: String, status: ExitStatus },

    #[error("invalid output pattern {pattern}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error(transparent)]
    Style(#[from] StyleError),
}
