mod csv_log;
mod error;
mod filename;
mod log;
mod patterns;
mod tabulate;

#[cfg(test)]
mod tests;

pub use csv_log::{CsvLayout, detect_layout, load_csv};
pub use error::ParseError;
pub use filename::scenario_from_filename;
pub use log::{LogParser, ParserState, normalize_key};
pub use tabulate::{
    LOG_GLOB, TabulateReport, TabulationStatus, discover_logs, read_status,
    status_file_path, tabulate_directory, write_long_csv,
};
