use crate::conf::PlotterConfig;
use crate::plot::{PlotError, Plotter};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs an external plotter on a script written next to the CSV file.
#[derive(Debug, Clone)]
pub struct GnuplotPlotter {
    executable: String,
    args: Vec<String>,
}

impl GnuplotPlotter {
    pub fn new(config: &PlotterConfig) -> Self {
        Self {
            executable: config.executable.clone(),
            args: config.args.clone(),
        }
    }
}

impl Plotter for GnuplotPlotter {
    fn plot(&self, csv_path: &Path, script: &str) -> Result<Vec<PathBuf>, PlotError> {
        let script_path = csv_path.with_extension("gpt");
        fs::write(&script_path, script).map_err(|e| PlotError::Write {
            path: script_path.clone(),
            source: e,
        })?;

        let status = Command::new(&self.executable)
            .args(&self.args)
            .arg(&script_path)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| PlotError::Spawn {
                program: self.executable.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(PlotError::Failed {
                program: self.executable.clone(),
                status,
            });
        }

        let outputs = plotted_files(csv_path)?;
        tracing::debug!(csv = %csv_path.display(), files = outputs.len(), "plotted graph");
        Ok(outputs)
    }
}

/// Files produced for a graph: everything sharing the CSV's stem except its
/// data and script.
pub fn plotted_files(csv_path: &Path) -> Result<Vec<PathBuf>, PlotError> {
    let stem = csv_path.with_extension("");
    let pattern = format!("{}.*", glob::Pattern::escape(&stem.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob(&pattern)
        .map_err(|e| PlotError::Glob {
            pattern: pattern.clone(),
            source: e,
        })?
        .filter_map(Result::ok)
        .filter(|p| !p.extension().is_some_and(|ext| ext == "csv" || ext == "gpt"))
        .collect();
    files.sort();
    Ok(files)
}
