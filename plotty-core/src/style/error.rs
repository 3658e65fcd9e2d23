use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("failed to read style file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid style file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown graph format '{key}'")]
    UnknownGraphFormat { key: String },

    #[error("graph format '{key}' inherits from unknown format '{parent}'")]
    UnknownParent { key: String, parent: String },

    #[error("graph format '{key}' inherits from itself through '{parent}'")]
    InheritanceCycle { key: String, parent: String },
}
