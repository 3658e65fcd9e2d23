use crate::conf::PlottyConfig;
use crate::model::DataTable;
use crate::parse::{discover_logs, load_csv, status_file_path, tabulate_directory};
use crate::source::worker::PidMarker;
use crate::source::{LogSource, SourceError};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// What a log name refers to on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLocation {
    /// A directory of `*.log.gz` files.
    Directory(PathBuf),
    /// A `.csv` or `.csv.gz` table.
    Csv(PathBuf),
}

/// Logs kept under a single directory, with tabulated copies of log
/// directories cached in `tabulate_dir`.
#[derive(Debug, Clone)]
pub struct LogDirectory {
    log_dir: PathBuf,
    tabulate_dir: PathBuf,
    status_dir: PathBuf,
    background: bool,
    worker: Option<PathBuf>,
}

impl LogDirectory {
    pub fn new(log_dir: impl Into<PathBuf>, tabulate_dir: impl Into<PathBuf>) -> Self {
        let tabulate_dir = tabulate_dir.into();
        Self {
            log_dir: log_dir.into(),
            status_dir: tabulate_dir.join("status"),
            tabulate_dir,
            background: false,
            worker: None,
        }
    }

    pub fn from_config(config: &PlottyConfig) -> Self {
        Self {
            log_dir: config.log_dir.clone(),
            tabulate_dir: config.tabulate_dir.clone(),
            status_dir: config.status_dir.clone(),
            background: config.tabulate.background,
            worker: config.tabulate.worker.clone(),
        }
    }

    pub fn locate(&self, log: &str) -> Result<LogLocation, SourceError> {
        let direct = self.log_dir.join(log);
        if direct.is_dir() {
            return Ok(LogLocation::Directory(direct));
        }
        if direct.is_file() && is_csv(&direct) {
            return Ok(LogLocation::Csv(direct));
        }
        for ext in ["csv", "csv.gz"] {
            let candidate = self.log_dir.join(format!("{log}.{ext}"));
            if candidate.is_file() {
                return Ok(LogLocation::Csv(candidate));
            }
        }
        Err(SourceError::NotFound {
            log: log.to_string(),
            dir: self.log_dir.clone(),
        })
    }

    pub fn tabulated_path(&self, log: &str) -> PathBuf {
        self.tabulate_dir.join(format!("{log}.csv.gz"))
    }

    fn load_directory(
        &self,
        log: &str,
        dir: &Path,
        modified: DateTime<Utc>,
    ) -> Result<DataTable, SourceError> {
        let tabulated = self.tabulated_path(log);
        let marker = PidMarker::new(&self.tabulate_dir, log);

        if let Some(pid) = marker.running()? {
            return Err(SourceError::InProgress {
                log: log.to_string(),
                pid,
                status_file: status_file_path(&self.status_dir, pid),
            });
        }

        let fresh = mtime(&tabulated).is_ok_and(|t| t >= modified);
        if !fresh {
            if self.background {
                return Err(self.spawn_worker(log, dir, &tabulated, &marker)?);
            }
            fs::create_dir_all(&self.tabulate_dir)
                .map_err(|e| SourceError::io(&self.tabulate_dir, e))?;
            tabulate_directory(dir, &tabulated, None)?;
        } else {
            tracing::debug!(log, tabulated = %tabulated.display(), "using tabulated log");
        }

        let records = load_csv(log, &tabulated)?;
        Ok(DataTable::from_records(log, records, modified))
    }

    /// Starts a tabulation worker and returns the in-progress signal for it.
    fn spawn_worker(
        &self,
        log: &str,
        dir: &Path,
        out: &Path,
        marker: &PidMarker,
    ) -> Result<SourceError, SourceError> {
        let program = match &self.worker {
            Some(worker) => worker.clone(),
            None => std::env::current_exe().map_err(|e| SourceError::Spawn {
                program: PathBuf::from("plotty"),
                source: e,
            })?,
        };

        fs::create_dir_all(&self.tabulate_dir)
            .map_err(|e| SourceError::io(&self.tabulate_dir, e))?;

        let child = Command::new(&program)
            .arg("tabulate")
            .arg(dir)
            .arg(out)
            .arg("--status-dir")
            .arg(&self.status_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| SourceError::Spawn {
                program: program.clone(),
                source: e,
            })?;

        let pid = child.id();
        marker.write(pid)?;
        tracing::info!(log, pid, worker = %program.display(), "started background tabulation");

        Ok(SourceError::InProgress {
            log: log.to_string(),
            pid,
            status_file: status_file_path(&self.status_dir, pid),
        })
    }
}

impl LogSource for LogDirectory {
    fn modified(&self, log: &str) -> Result<DateTime<Utc>, SourceError> {
        match self.locate(log)? {
            LogLocation::Csv(path) => mtime(&path),
            LogLocation::Directory(dir) => {
                let mut latest = mtime(&dir)?;
                for file in discover_logs(&dir)? {
                    latest = latest.max(mtime(&file)?);
                }
                Ok(latest)
            }
        }
    }

    fn load(&self, log: &str) -> Result<DataTable, SourceError> {
        let modified = self.modified(log)?;
        match self.locate(log)? {
            LogLocation::Csv(path) => {
                let records = load_csv(log, &path)?;
                Ok(DataTable::from_records(log, records, modified))
            }
            LogLocation::Directory(dir) => self.load_directory(log, &dir, modified),
        }
    }
}

fn is_csv(path: &Path) -> bool {
    let name = path.to_string_lossy();
    name.ends_with(".csv") || name.ends_with(".csv.gz")
}

fn mtime(path: &Path) -> Result<DateTime<Utc>, SourceError> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .map_err(|e| SourceError::io(path, e))
}
