use flate2::Compression;
use flate2::write::GzEncoder;
use plotty_core::conf::{CONFIG_FILE, PlottyConfig, load_config};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// A throwaway plotty config directory with its own logs, cache and graphs.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// Creates the workspace with a `plotty.hcl`; `extra_hcl` is appended to it.
    pub fn new(extra_hcl: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        fs::create_dir_all(dir.path().join("logs")).expect("failed to create log dir");

        let hcl = format!(
            "confidence_level = 0.95\n\
             log_dir = \"logs\"\n\
             cache_dir = \"cache\"\n\
             tabulate_dir = \"tabulate\"\n\
             graph_dir = \"graphs\"\n\
             status_dir = \"status\"\n\
             {extra_hcl}\n"
        );
        fs::write(dir.path().join(CONFIG_FILE), hcl).expect("failed to write config");

        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> PlottyConfig {
        load_config(self.root()).expect("failed to load workspace config")
    }

    pub fn log_dir(&self, log: &str) -> PathBuf {
        self.root().join("logs").join(log)
    }

    /// Writes a gzip benchmark log into the log directory `log`.
    pub fn write_log(&self, log: &str, file: &str, text: &str) -> PathBuf {
        let dir = self.log_dir(log);
        fs::create_dir_all(&dir).expect("failed to create log dir");
        let path = dir.join(file);

        let mut enc = GzEncoder::new(
            File::create(&path).expect("failed to create log"),
            Compression::default(),
        );
        enc.write_all(text.as_bytes()).expect("failed to write log");
        enc.finish().expect("failed to finish log");
        path
    }

    /// Writes a CSV log next to the log directories.
    pub fn write_csv(&self, name: &str, text: &str) -> PathBuf {
        let path = self.root().join("logs").join(name);
        fs::write(&path, text).expect("failed to write CSV log");
        path
    }

    pub fn write_file(&self, name: &str, text: &str) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, text).expect("failed to write file");
        path
    }

    /// Waits long enough for the next write to get a later mtime.
    pub fn tick(&self) {
        thread::sleep(Duration::from_millis(50));
    }
}

/// Log text with one invocation per entry of `msecs`.
pub fn passed_log(msecs: &[u32]) -> String {
    msecs
        .iter()
        .map(|ms| format!("mkdir timedrun\n===== DaCapo PASSED in {ms} msec =====\n"))
        .collect()
}
