use crate::style::{FormatStyleEntry, GraphFormat, StyleError, StyleStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Styles kept in a single JSON document.
///
/// ```json
/// {
///   "format_styles": { "builds": [ { "value": "jdk8", "display": "JDK 8" } ] },
///   "graph_formats": { "wide": { "value": "set size 2,1", "parent": "base" } }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonStyleStore {
    #[serde(default)]
    pub format_styles: BTreeMap<String, Vec<FormatStyleEntry>>,
    #[serde(default)]
    pub graph_formats: BTreeMap<String, GraphFormat>,
}

impl JsonStyleStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, StyleError> {
        let text = fs::read_to_string(path).map_err(|e| StyleError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&text).map_err(|e| StyleError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl StyleStore for JsonStyleStore {
    fn format_style(&self, key: &str) -> Result<Option<Vec<FormatStyleEntry>>, StyleError> {
        Ok(self.format_styles.get(key).map(|entries| {
            entries
                .iter()
                .enumerate()
                .map(|(i, e)| FormatStyleEntry {
                    index: e.index.or(Some(i as i64)),
                    ..e.clone()
                })
                .collect()
        }))
    }

    fn graph_format(&self, key: &str) -> Result<Option<GraphFormat>, StyleError> {
        Ok(self.graph_formats.get(key).cloned())
    }
}
