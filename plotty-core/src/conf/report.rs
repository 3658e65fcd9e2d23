use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub field: &'static str,
    pub message: String,
    pub help: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_violations(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    pub(crate) fn error(&mut self, field: &'static str, message: String, help: Option<String>) {
        self.errors.push(ValidationIssue {
            severity: Severity::Error,
            field,
            message,
            help,
        });
    }

    pub(crate) fn warning(&mut self, field: &'static str, message: String, help: Option<String>) {
        self.warnings.push(ValidationIssue {
            severity: Severity::Warning,
            field,
            message,
            help,
        });
    }

    pub fn render_plain(&self) {
        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let severity = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            eprintln!("{}: {}: {}", issue.field, severity, issue.message);
            if let Some(help) = &issue.help {
                eprintln!("  help: {help}");
            }
        }
    }

    pub fn render_pretty(&self) {
        if self.has_violations() {
            eprintln!(
                "configuration validation found {} error(s), {} warning(s)\n",
                self.errors.len(),
                self.warnings.len()
            );
        }

        for issue in self.errors.iter().chain(self.warnings.iter()) {
            match issue.severity {
                Severity::Error => {
                    eprintln!("  {} {}: {}", "error".red().bold(), issue.field, issue.message)
                }
                Severity::Warning => eprintln!(
                    "  {} {}: {}",
                    "warning".yellow().bold(),
                    issue.field,
                    issue.message
                ),
            }
            if let Some(help) = &issue.help {
                eprintln!("    {} {help}", "help:".dimmed());
            }
        }
    }
}
