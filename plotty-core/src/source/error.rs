use crate::parse::ParseError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("log '{log}' not found under {dir}")]
    NotFound { log: String, dir: PathBuf },

    #[error("failed to inspect {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to start tabulation worker {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not a failure: the log is being tabulated by another process.
    #[error("log '{log}' is being tabulated by process {pid}")]
    InProgress {
        log: String,
        pid: u32,
        status_file: PathBuf,
    },
}

impl SourceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
