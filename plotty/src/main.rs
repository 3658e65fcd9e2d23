use clap::{Parser, Subcommand};
use plotty_core::cli;
use plotty_core::logging::{LogFormat, default_log_format, init_logging};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "plotty",
    version,
    about = "Plotty: benchmark log analysis pipelines"
)]
struct Cli {
    /// Log as JSON lines instead of the terminal default
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute an encoded pipeline
    Run {
        /// Pipeline text, e.g. '0|run1&&&|2&1&invocation'
        pipeline: String,

        /// Directory holding plotty.hcl
        #[arg(long, default_value = ".")]
        config: PathBuf,

        /// Print the final table as CSV
        #[arg(long)]
        csv: bool,

        /// Plot graph outputs with the configured plotter
        #[arg(long)]
        plot: bool,
    },

    /// Decode a pipeline and print it
    Decode {
        pipeline: String,

        /// Output as JSON
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,
    },

    /// Parse a directory of logs into a gzip CSV
    Tabulate {
        dir: PathBuf,
        out: PathBuf,

        /// Write progress to <status-dir>/<pid>.status
        #[arg(long)]
        status_dir: Option<PathBuf>,
    },

    /// Show the progress of a background tabulation
    Status { status_file: PathBuf },

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: cli::conf::ConfigCmd,
    },
}

fn main() {
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        default_log_format()
    };
    init_logging(format);
    tracing::debug!(command = ?cli.command, "starting");

    let result = match cli.command {
        Command::Run {
            pipeline,
            config,
            csv,
            plot,
        } => cli::run::run(&pipeline, config, csv, plot),
        Command::Decode {
            pipeline,
            json,
            yaml,
        } => cli::decode::decode(&pipeline, json, yaml),
        Command::Tabulate {
            dir,
            out,
            status_dir,
        } => cli::tabulate::tabulate(dir, out, status_dir),
        Command::Status { status_file } => cli::status::status(status_file),
        Command::Config { cmd } => cli::conf::run(cmd),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
