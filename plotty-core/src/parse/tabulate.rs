use crate::model::LogRecord;
use crate::parse::error::ParseError;
use crate::parse::log::LogParser;
use flate2::Compression;
use flate2::write::GzEncoder;
use glob::glob;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const LOG_GLOB: &str = "*.log.gz";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabulateReport {
    pub files: usize,
    pub records: usize,
}

/// Progress of a background tabulation, as read back from its status file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabulationStatus {
    pub done: u64,
    pub total: u64,
}

impl TabulationStatus {
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done >= self.total
    }
}

/// Finds the gzip logs of a log directory, sorted by name.
pub fn discover_logs(dir: &Path) -> Result<Vec<PathBuf>, ParseError> {
    let pattern = dir.join(LOG_GLOB).to_string_lossy().into_owned();
    let mut paths: Vec<_> = glob(&pattern)
        .map_err(|e| ParseError::Glob {
            pattern: pattern.clone(),
            source: e,
        })?
        .filter_map(Result::ok)
        .collect();

    paths.sort();
    Ok(paths)
}

fn parse_batch(
    log_id: &str,
    files: &[PathBuf],
    progress: &mut dyn FnMut(usize) -> Result<(), ParseError>,
) -> Result<Vec<LogRecord>, ParseError> {
    let mut parser = LogParser::new();
    let mut records = Vec::new();

    for (n, path) in files.iter().enumerate() {
        let parsed = parser.parse_file(log_id, path)?;
        tracing::debug!(file = %path.display(), records = parsed.len(), "parsed log file");
        records.extend(parsed);
        progress(n + 1)?;
    }

    Ok(records)
}

/// Parses a log directory and writes the result as a gzip long-format CSV.
///
/// With a `status_dir`, progress goes to `<status_dir>/<pid>.status`: the first line
/// is the number of steps (files plus the final write), then one line per step done.
pub fn tabulate_directory(
    dir: &Path,
    out: &Path,
    status_dir: Option<&Path>,
) -> Result<TabulateReport, ParseError> {
    let files = discover_logs(dir)?;
    let log_id = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut status = match status_dir {
        Some(status_dir) => Some(StatusWriter::create(status_dir, files.len() as u64 + 1)?),
        None => None,
    };

    tracing::info!(
        dir = %dir.display(),
        files = files.len(),
        pid = std::process::id(),
        "tabulating log directory"
    );

    let mut progress = |n: usize| match status.as_mut() {
        Some(s) => s.step(n as u64),
        None => Ok(()),
    };
    let records = parse_batch(&log_id, &files, &mut progress)?;

    write_long_csv(out, &records)?;

    if let Some(s) = status.as_mut() {
        s.step(files.len() as u64 + 1)?;
    }

    tracing::info!(out = %out.display(), records = records.len(), "tabulation finished");

    Ok(TabulateReport {
        files: files.len(),
        records: records.len(),
    })
}

/// Writes records as gzip long-format CSV: sorted scenario columns, then `key,value`.
///
/// The file is written under a temporary name and renamed into place once complete.
pub fn write_long_csv(out: &Path, records: &[LogRecord]) -> Result<(), ParseError> {
    let headers: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.scenario.keys().map(String::as_str))
        .collect();

    let tmp = out.with_extension("tmp");
    let file = File::create(&tmp).map_err(|e| ParseError::write(&tmp, e))?;
    let mut writer = csv::Writer::from_writer(GzEncoder::new(file, Compression::default()));

    let header_row: Vec<&str> = headers
        .iter()
        .copied()
        .chain(["key", "value"])
        .collect();
    writer
        .write_record(&header_row)
        .map_err(|e| csv_write_error(out, e))?;

    for record in records {
        let scenario: Vec<&str> = headers
            .iter()
            .map(|h| record.scenario.get(*h).map(String::as_str).unwrap_or(""))
            .collect();
        for (key, value) in &record.values {
            let mut row = scenario.clone();
            row.push(key);
            row.push(value);
            writer
                .write_record(&row)
                .map_err(|e| csv_write_error(out, e))?;
        }
    }

    let encoder = writer
        .into_inner()
        .map_err(|e| ParseError::write(&tmp, e.into_error()))?;
    encoder.finish().map_err(|e| ParseError::write(&tmp, e))?;

    fs::rename(&tmp, out).map_err(|e| ParseError::write(out, e))?;
    Ok(())
}

/// Reads a status file written by [`tabulate_directory`].
pub fn read_status(path: &Path) -> Result<TabulationStatus, ParseError> {
    let text = fs::read_to_string(path).map_err(|e| ParseError::read(path, e))?;
    let mut numbers = text.lines().filter_map(|l| l.trim().parse::<u64>().ok());

    let total = numbers.next().unwrap_or(0);
    let done = numbers.last().unwrap_or(0);
    Ok(TabulationStatus { done, total })
}

pub fn status_file_path(status_dir: &Path, pid: u32) -> PathBuf {
    status_dir.join(format!("{pid}.status"))
}

struct StatusWriter {
    path: PathBuf,
    file: File,
}

impl StatusWriter {
    fn create(status_dir: &Path, total: u64) -> Result<Self, ParseError> {
        fs::create_dir_all(status_dir).map_err(|e| ParseError::write(status_dir, e))?;
        let path = status_file_path(status_dir, std::process::id());
        let file = File::create(&path).map_err(|e| ParseError::write(&path, e))?;
        let mut writer = Self { path, file };
        writer.line(total)?;
        Ok(writer)
    }

    fn step(&mut self, done: u64) -> Result<(), ParseError> {
        self.line(done)
    }

    fn line(&mut self, n: u64) -> Result<(), ParseError> {
        writeln!(self.file, "{n}")
            .and_then(|_| self.file.flush())
            .map_err(|e| ParseError::write(&self.path, e))
    }
}

fn csv_write_error(path: &Path, source: csv::Error) -> ParseError {
    ParseError::CsvWrite {
        path: path.to_path_buf(),
        source,
    }
}
