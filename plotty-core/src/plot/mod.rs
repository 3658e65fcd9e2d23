mod error;
mod gnuplot;
mod template;


pub use error::PlotError;
pub use gnuplot::{GnuplotPlotter, plotted_files};
pub use template::{check_template, default_template, render_template};

use crate::block::GraphOutput;
use crate::pipeline::PipelineOutput;
use crate::style::StyleStore;
use crate::util::fingerprint::digest;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Turns a graph CSV plus a rendered script into image files.
pub trait Plotter {
    fn plot(&self, csv_path: &Path, script: &str) -> Result<Vec<PathBuf>, PlotError>;
}

/// Files written for one graph of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphFiles {
    pub title: String,
    pub csv: PathBuf,
    pub images: Vec<PathBuf>,
}

/// Path of a graph's CSV inside `graph_dir`, named by the digest of its content.
pub fn graph_csv_path(graph_dir: &Path, graph: &GraphOutput) -> PathBuf {
    let key = format!(
        "{}\n{}\n{}",
        graph.style.as_deref().unwrap_or_default(),
        graph.title,
        graph.csv
    );
    graph_dir.join(format!("{}.csv", digest(&key)))
}

/// Writes the graph CSV unless an up-to-date copy exists.
///
/// Returns the path and whether it was (re)written.
pub fn write_graph_csv(
    graph_dir: &Path,
    graph: &GraphOutput,
    last_modified: DateTime<Utc>,
) -> Result<(PathBuf, bool), PlotError> {
    let path = graph_csv_path(graph_dir, graph);
    let fresh = fs::metadata(&path)
        .and_then(|m| m.modified())
        .is_ok_and(|t| DateTime::<Utc>::from(t) >= last_modified);
    if fresh {
        return Ok((path, false));
    }

    fs::create_dir_all(graph_dir).map_err(|e| PlotError::Write {
        path: graph_dir.to_path_buf(),
        source: e,
    })?;
    fs::write(&path, &graph.csv).map_err(|e| PlotError::Write {
        path: path.clone(),
        source: e,
    })?;
    Ok((path, true))
}

/// Writes and plots every graph of a pipeline result.
///
/// Graphs whose CSV is already up to date are not plotted again.
pub fn plot_graphs(
    plotter: &dyn Plotter,
    styles: &dyn StyleStore,
    graph_dir: &Path,
    output: &PipelineOutput,
) -> Result<Vec<GraphFiles>, PlotError> {
    let mut files = Vec::with_capacity(output.graphs.len());

    for graph in &output.graphs {
        let (csv, written) = write_graph_csv(graph_dir, graph, output.table.last_modified)?;
        let existing = plotted_files(&csv)?;

        let images = if written || existing.is_empty() {
            let template = match graph.style.as_deref() {
                Some(key) => styles.graph_template(key)?,
                None => default_template(graph.kind).to_string(),
            };
            check_template(&template)?;
            let script = render_template(&template, graph, &csv.with_extension(""));
            plotter.plot(&csv, &script)?
        } else {
            tracing::debug!(csv = %csv.display(), "graph is up to date");
            existing
        };

        files.push(GraphFiles {
            title: graph.title.clone(),
            csv,
            images,
        });
    }

    Ok(files)
}
