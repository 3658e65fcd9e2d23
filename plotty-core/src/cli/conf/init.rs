use crate::conf::CONFIG_FILE;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::PathBuf;

pub fn init(path: PathBuf) -> Result<()> {
    let file = path.join(CONFIG_FILE);
    if file.exists() {
        bail!("{} already exists", file.display());
    }

    for dir in ["logs", "cache", "tabulate", "graphs"] {
        fs::create_dir_all(path.join(dir))
            .with_context(|| format!("failed to create {}", path.join(dir).display()))?;
    }
    fs::write(&file, CONFIG_HCL.trim_start())
        .with_context(|| format!("failed to write {}", file.display()))?;

    println!("✔ Initialized plotty config in {}", path.display());
    println!("✔ Created:");
    println!("  - {CONFIG_FILE}");
    println!("  - logs/ cache/ tabulate/ graphs/");

    println!();
    println!("Next steps:");
    println!("  copy benchmark logs into {}", path.join("logs").display());
    println!("  plotty config check {}", path.display());
    println!("  plotty run '0|<log>&&&' --config {}", path.display());

    Ok(())
}

const CONFIG_HCL: &str = r#"
confidence_level = 0.95

log_dir      = "logs"
cache_dir    = "cache"
tabulate_dir = "tabulate"
graph_dir    = "graphs"
status_dir   = "tabulate/status"

plotter {
  executable = "gnuplot"
}

tabulate {
  background = false
}
"#;
