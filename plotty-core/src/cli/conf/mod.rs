mod check;
mod dump;
mod init;

pub use check::*;
use clap::Subcommand;
pub use dump::*;
pub use init::*;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Path to config directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Print issues without colors
        #[arg(short, long, default_value = "false")]
        plain: bool,
    },

    /// Print resolved configuration
    Dump {
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output as JSON
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,
    },

    /// Write a starter plotty.hcl
    Init {
        /// Path to config directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

pub fn run(cmd: ConfigCmd) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Check { path, plain } => check(path, plain),
        ConfigCmd::Dump { path, json, yaml } => dump(path, json, yaml),
        ConfigCmd::Init { path } => init(path),
    }
}
