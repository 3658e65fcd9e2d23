use crate::cache::FileCache;
use crate::cli::render::{print_graph, print_messages, print_table, table_csv};
use crate::conf::{PlottyConfig, load_config};
use crate::pipeline::{Engine, Pipeline, PipelineError, PipelineOutput, tabulation_status};
use crate::plot::{GnuplotPlotter, plot_graphs};
use crate::source::LogDirectory;
use crate::style::JsonStyleStore;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Decodes and executes a pipeline against the configured logs.
pub fn run(pipeline: &str, config_dir: PathBuf, csv: bool, plot: bool) -> Result<()> {
    let config = load_config(&config_dir)?;
    let pipeline = Pipeline::decode(pipeline)?;
    let styles = load_styles(&config)?;

    let cache = FileCache::new(&config.cache_dir);
    let source = LogDirectory::from_config(&config);
    let engine = Engine::new(&cache, &source, &styles, config.confidence_level);

    let output = match engine.apply(&pipeline) {
        Ok(output) => output,
        Err(PipelineError::Ambiguity(ambiguity)) => {
            eprintln!(
                "{} block {} is ambiguous: {}",
                "warning".yellow().bold(),
                ambiguity.block,
                ambiguity.message
            );
            eprintln!("showing the result of the preceding blocks\n");
            ambiguity.recovered
        }
        Err(PipelineError::TabulationInProgress {
            log,
            pid,
            status_file,
        }) => {
            report_progress(&log, pid, &status_file);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    show(&output, csv)?;

    if plot && !output.graphs.is_empty() {
        let plotter = GnuplotPlotter::new(&config.plotter);
        let files = plot_graphs(&plotter, &styles, &config.graph_dir, &output)
            .context("failed to plot graphs")?;
        for graph in files {
            println!("✔ {}: {}", graph.title, graph.csv.display());
            for image in graph.images {
                println!("  - {}", image.display());
            }
        }
    }

    Ok(())
}

fn load_styles(config: &PlottyConfig) -> Result<JsonStyleStore> {
    match &config.styles {
        Some(path) => JsonStyleStore::load(path)
            .with_context(|| format!("failed to load styles from {}", path.display())),
        None => Ok(JsonStyleStore::empty()),
    }
}

fn show(output: &PipelineOutput, csv: bool) -> Result<()> {
    print_messages(&output.table.messages);

    if csv {
        print!("{}", table_csv(&output.table)?);
        return Ok(());
    }

    print_table(&output.table);
    for graph in &output.graphs {
        print_graph(graph);
    }
    Ok(())
}

fn report_progress(log: &str, pid: u32, status_file: &Path) {
    println!("log {log} is being tabulated by process {pid}");
    match tabulation_status(status_file) {
        Ok(status) => println!("{}/{} step(s) done", status.done, status.total),
        Err(_) => println!("waiting for the worker to report progress"),
    }
    println!("poll with: plotty status {}", status_file.display());
}
