use crate::pipeline::tabulation_status;
use std::path::PathBuf;

pub fn status(status_file: PathBuf) -> anyhow::Result<()> {
    let status = tabulation_status(&status_file)?;

    if status.is_complete() {
        println!("✔ tabulation complete ({} step(s))", status.total);
    } else {
        println!("{}/{} step(s) done", status.done, status.total);
    }
    Ok(())
}
