use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One flushed iteration as read from a log: its scenario and raw measurements.
///
/// Values stay textual until they are loaded into a table, where non-numeric
/// measurements are reported instead of failing the load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub scenario: BTreeMap<String, String>,
    pub values: Vec<(String, String)>,
}

impl LogRecord {
    pub fn new(scenario: BTreeMap<String, String>) -> Self {
        Self {
            scenario,
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
