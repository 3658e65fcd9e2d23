use crate::conf::{ConfigError, load_config};
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool) -> anyhow::Result<()> {
    match load_config(&path) {
        Ok(cfg) => {
            println!("✔ Config loaded successfully");
            println!("✔ confidence level {}", cfg.confidence_level);
            println!("✔ logs in {}", cfg.log_dir.display());
            println!("✔ cache in {}", cfg.cache_dir.display());
            match &cfg.styles {
                Some(styles) => println!("✔ styles from {}", styles.display()),
                None => println!("✔ no style file"),
            }
            println!("✔ plotter {}", cfg.plotter.executable);
            if cfg.tabulate.background {
                println!("✔ log directories are tabulated in the background");
            }
            Ok(())
        }
        Err(err) => {
            print_config_error(err, plain);
            std::process::exit(1);
        }
    }
}

fn print_config_error(err: ConfigError, plain: bool) {
    match err {
        ConfigError::Validation { report } if plain => report.render_plain(),
        ConfigError::Validation { report } => report.render_pretty(),
        other => {
            eprintln!("{other}");
            if let Some(hint) = config_error_hint(&other) {
                eprintln!();
                eprintln!("{hint}");
            }
        }
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::ReadFile { .. } => Some(
            "Plotty looks for plotty.hcl in the config directory.\n\
             \n\
             Create one with:\n\
             \n\
             plotty config init <dir>",
        ),

        ConfigError::Parse { .. } => Some(
            "The configuration is HCL. Attributes are `name = value` and blocks are\n\
             `name { ... }`.\n\
             \n\
             Example:\n\
             \n\
             confidence_level = 0.95\n\
             log_dir          = \"logs\"\n\
             \n\
             plotter {\n\
               executable = \"gnuplot\"\n\
             }",
        ),

        ConfigError::Validation { .. } => None,
    }
}
