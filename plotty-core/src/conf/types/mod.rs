use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of `plotty.hcl`.
///
/// Relative directories are resolved against the directory holding the file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlottyConfig {
    /// Two-sided confidence level for aggregate intervals.
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Where tabulated CSV copies of log directories are kept.
    #[serde(default = "default_tabulate_dir")]
    pub tabulate_dir: PathBuf,

    #[serde(default = "default_graph_dir")]
    pub graph_dir: PathBuf,

    /// Progress files of background tabulation workers.
    #[serde(default = "default_status_dir")]
    pub status_dir: PathBuf,

    /// JSON file of format styles and graph templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<PathBuf>,

    #[serde(default)]
    pub plotter: PlotterConfig,

    #[serde(default)]
    pub tabulate: TabulateConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlotterConfig {
    #[serde(default = "default_plotter_executable")]
    pub executable: String,

    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TabulateConfig {
    /// Hand uncached log directories to a worker process instead of parsing in-line.
    #[serde(default)]
    pub background: bool,

    /// Worker executable; defaults to the running binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<PathBuf>,
}

impl Default for PlottyConfig {
    fn default() -> Self {
        Self {
            confidence_level: default_confidence_level(),
            log_dir: default_log_dir(),
            cache_dir: default_cache_dir(),
            tabulate_dir: default_tabulate_dir(),
            graph_dir: default_graph_dir(),
            status_dir: default_status_dir(),
            styles: None,
            plotter: PlotterConfig::default(),
            tabulate: TabulateConfig::default(),
        }
    }
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            executable: default_plotter_executable(),
            args: Vec::new(),
        }
    }
}

impl PlottyConfig {
    /// Makes every relative path absolute against `root`.
    pub fn resolve_paths(&mut self, root: &Path) {
        for dir in [
            &mut self.log_dir,
            &mut self.cache_dir,
            &mut self.tabulate_dir,
            &mut self.graph_dir,
            &mut self.status_dir,
        ] {
            *dir = resolve(root, dir);
        }
        if let Some(styles) = self.styles.as_mut() {
            *styles = resolve(root, styles);
        }
        if let Some(worker) = self.tabulate.worker.as_mut() {
            *worker = resolve(root, worker);
        }
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn default_confidence_level() -> f64 {
    0.95
}
fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}
fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}
fn default_tabulate_dir() -> PathBuf {
    PathBuf::from("tabulate")
}
fn default_graph_dir() -> PathBuf {
    PathBuf::from("graphs")
}
fn default_status_dir() -> PathBuf {
    PathBuf::from("status")
}
fn default_plotter_executable() -> String {
    "gnuplot".to_string()
}
