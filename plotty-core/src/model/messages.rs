use serde::{Deserialize, Serialize};

/// Non-fatal diagnostics collected while building and transforming a table.
///
/// Messages only ever grow: they are appended to or concatenated with another set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Messages {
    pub info: Vec<(String, String)>,
    pub warn: Vec<(String, String)>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, title: impl Into<String>, detail: impl Into<String>) {
        let (title, detail) = (title.into(), detail.into());
        tracing::info!(title = %title, detail = %detail, "table diagnostic");
        self.info.push((title, detail));
    }

    pub fn warn(&mut self, title: impl Into<String>, detail: impl Into<String>) {
        let (title, detail) = (title.into(), detail.into());
        tracing::warn!(title = %title, detail = %detail, "table diagnostic");
        self.warn.push((title, detail));
    }

    pub fn extend(&mut self, other: Messages) {
        self.info.extend(other.info);
        self.warn.extend(other.warn);
    }

    pub fn is_empty(&self) -> bool {
        self.info.is_empty() && self.warn.is_empty()
    }

    pub fn len(&self) -> usize {
        self.info.len() + self.warn.len()
    }
}
