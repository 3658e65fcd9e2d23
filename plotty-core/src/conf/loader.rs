use crate::conf::error::ConfigError;
use crate::conf::types::PlottyConfig;
use crate::conf::validate::validate_config;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "plotty.hcl";

/// Loads, resolves and validates `<root>/plotty.hcl`.
///
/// Validation warnings are logged; errors fail the load.
pub fn load_config(root: &Path) -> Result<PlottyConfig, ConfigError> {
    let path = root.join(CONFIG_FILE);

    //--------------------------------------------------------------------------
    // Hard fail: IO and parsing
    //--------------------------------------------------------------------------
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::read_file(&path, e))?;
    let mut config = parse_config(&path, &text)?;
    config.resolve_paths(root);

    //--------------------------------------------------------------------------
    // Semantic validation (aggregate all issues)
    //--------------------------------------------------------------------------
    let report = validate_config(&config);
    for warning in &report.warnings {
        tracing::warn!(field = warning.field, "{}", warning.message);
    }
    if report.has_errors() {
        return Err(ConfigError::Validation { report });
    }

    tracing::debug!(config = %path.display(), "configuration loaded");
    Ok(config)
}

pub fn parse_config(path: &Path, text: &str) -> Result<PlottyConfig, ConfigError> {
    hcl::from_str(text).map_err(|e| ConfigError::parse(path, e))
}
