mod directory;
mod error;
mod worker;


pub use directory::{LogDirectory, LogLocation};
pub use error::SourceError;
pub use worker::{PidMarker, is_alive};

use crate::model::DataTable;
use chrono::{DateTime, Utc};

/// Where the engine gets log tables from.
pub trait LogSource {
    /// Most recent modification of anything the log is built from.
    fn modified(&self, log: &str) -> Result<DateTime<Utc>, SourceError>;

    /// Parses (or re-reads) a log into a table stamped with [`LogSource::modified`].
    fn load(&self, log: &str) -> Result<DataTable, SourceError>;
}
