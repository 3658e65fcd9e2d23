mod error;
mod loader;
mod report;
pub mod types;
mod validate;

#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use loader::{CONFIG_FILE, load_config, parse_config};
pub use report::{Severity, ValidationIssue, ValidationReport};
pub use types::{PlotterConfig, PlottyConfig, TabulateConfig};
pub use validate::validate_config;
