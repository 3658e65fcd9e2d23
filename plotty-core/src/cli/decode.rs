use crate::cli::conf::{dump_json, dump_yaml};
use crate::pipeline::Pipeline;

/// Prints the decoded form of a pipeline, or its canonical encoding.
pub fn decode(pipeline: &str, json: bool, yaml: bool) -> anyhow::Result<()> {
    let pipeline = Pipeline::decode(pipeline)?;

    if yaml {
        dump_yaml(&pipeline)?;
    } else if json {
        dump_json(&pipeline)?;
    } else {
        println!("{}", pipeline.encode());
    }

    Ok(())
}
