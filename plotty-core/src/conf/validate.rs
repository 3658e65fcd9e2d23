use crate::conf::report::ValidationReport;
use crate::conf::types::PlottyConfig;

/// Checks a resolved configuration.
///
/// Missing directories are only warnings: the cache, tabulate, graph and
/// status directories are created on first use.
pub fn validate_config(config: &PlottyConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    let level = config.confidence_level;
    if !(level > 0.0 && level < 1.0) {
        report.error(
            "confidence_level",
            format!("confidence level {level} is outside (0, 1)"),
            Some("use a fraction such as 0.95".to_string()),
        );
    }

    if config.plotter.executable.trim().is_empty() {
        report.error(
            "plotter.executable",
            "plotter executable is empty".to_string(),
            Some("set it to the gnuplot binary, e.g. executable = \"gnuplot\"".to_string()),
        );
    }

    if !config.log_dir.is_dir() {
        report.warning(
            "log_dir",
            format!("log directory {} does not exist", config.log_dir.display()),
            None,
        );
    }

    if let Some(styles) = config.styles.as_ref().filter(|s| !s.is_file()) {
        report.error(
            "styles",
            format!("style file {} does not exist", styles.display()),
            None,
        );
    }

    if let Some(worker) = config.tabulate.worker.as_ref().filter(|w| !w.is_file()) {
        report.error(
            "tabulate.worker",
            format!("tabulation worker {} does not exist", worker.display()),
            None,
        );
    }

    report
}
