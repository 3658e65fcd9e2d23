use crate::parse::tabulate_directory;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Parses a log directory into a gzip CSV; the body of background workers.
pub fn tabulate(dir: PathBuf, out: PathBuf, status_dir: Option<PathBuf>) -> Result<()> {
    let report = tabulate_directory(&dir, &out, status_dir.as_deref())
        .with_context(|| format!("failed to tabulate {}", dir.display()))?;

    println!(
        "✔ {} record(s) from {} log(s) written to {}",
        report.records,
        report.files,
        out.display()
    );
    Ok(())
}
