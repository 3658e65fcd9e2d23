mod error;
mod json;


pub use error::StyleError;
pub use json::JsonStyleStore;

use serde::{Deserialize, Serialize};

/// One raw value of a format style and how to present it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatStyleEntry {
    pub value: String,
    pub display: String,
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A graph template, optionally extending another one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphFormat {
    pub value: String,
    #[serde(default)]
    pub parent: Option<String>,
}

/// Keyed storage of display styles and graph templates.
pub trait StyleStore {
    /// The ordered entries of a format style, if the key exists.
    fn format_style(&self, key: &str) -> Result<Option<Vec<FormatStyleEntry>>, StyleError>;

    fn graph_format(&self, key: &str) -> Result<Option<GraphFormat>, StyleError>;

    /// Template text for a graph format with its parent's text prepended.
    ///
    /// Inheritance is a single level: a parent's own parent is not followed,
    /// but a parent pointing back at `key` is rejected as a cycle.
    fn graph_template(&self, key: &str) -> Result<String, StyleError> {
        let format = self
            .graph_format(key)?
            .ok_or_else(|| StyleError::UnknownGraphFormat {
                key: key.to_string(),
            })?;

        let Some(parent_key) = format.parent.as_deref() else {
            return Ok(format.value);
        };

        if parent_key == key {
            return Err(StyleError::InheritanceCycle {
                key: key.to_string(),
                parent: parent_key.to_string(),
            });
        }

        let parent = self
            .graph_format(parent_key)?
            .ok_or_else(|| StyleError::UnknownParent {
                key: key.to_string(),
                parent: parent_key.to_string(),
            })?;

        if parent.parent.as_deref() == Some(key) {
            return Err(StyleError::InheritanceCycle {
                key: key.to_string(),
                parent: parent_key.to_string(),
            });
        }

        Ok(format!("{}\n{}", parent.value, format.value))
    }
}
