use crate::model::messages::Messages;
use crate::model::record::LogRecord;
use crate::model::row::{DataRow, Value};
use crate::model::scenario::{Scenario, ScenarioCell};
use crate::util::fingerprint::fingerprint_all;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A sparse table of benchmark observations.
///
/// The declared column sets are the universe of names the table knows about;
/// any single row may populate only some of them. Row order is kept stable so
/// serialized tables (and therefore cache entries) are deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTable {
    pub rows: Vec<DataRow>,
    pub scenario_columns: BTreeSet<String>,
    pub value_columns: BTreeSet<String>,
    pub value_labels: BTreeMap<String, String>,
    pub last_modified: DateTime<Utc>,
    pub messages: Messages,
}

impl Default for DataTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DataTable {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            scenario_columns: BTreeSet::new(),
            value_columns: BTreeSet::new(),
            value_labels: BTreeMap::new(),
            last_modified: DateTime::<Utc>::UNIX_EPOCH,
            messages: Messages::new(),
        }
    }

    /// Builds a table from parsed records of one log.
    ///
    /// Records sharing a scenario are merged into one row; a later measurement of
    /// the same key replaces an earlier one.
    pub fn from_records(log: &str, records: Vec<LogRecord>, last_modified: DateTime<Utc>) -> Self {
        let mut table = DataTable::new();
        table.last_modified = last_modified;

        let mut index: AHashMap<String, usize> = AHashMap::new();
        let mut non_numeric: BTreeMap<String, usize> = BTreeMap::new();

        for record in records {
            let mut scenario: Scenario = record
                .scenario
                .into_iter()
                .map(|(k, v)| (k, ScenarioCell::Raw(v)))
                .collect();
            scenario
                .entry("log".to_string())
                .or_insert_with(|| ScenarioCell::Raw(log.to_string()));

            let key = fingerprint_all(&scenario);
            let slot = match index.get(&key) {
                Some(slot) => *slot,
                None => {
                    table.scenario_columns.extend(scenario.keys().cloned());
                    table.rows.push(DataRow::new(scenario));
                    index.insert(key, table.rows.len() - 1);
                    table.rows.len() - 1
                }
            };

            for (name, raw) in record.values {
                match raw.trim().parse::<f64>() {
                    Ok(v) => {
                        table.value_columns.insert(name.clone());
                        table.rows[slot].values.insert(name, Value::Number(v));
                    }
                    Err(_) => *non_numeric.entry(name).or_default() += 1,
                }
            }
        }

        for (name, count) in non_numeric {
            table.messages.warn(
                "Non-numeric values",
                format!("{count} non-numeric value(s) for '{name}' in log {log} were ignored"),
            );
        }

        table
    }

    /// Appends another table's rows and unions its metadata.
    pub fn merge(&mut self, other: DataTable) {
        self.rows.extend(other.rows);
        self.scenario_columns.extend(other.scenario_columns);
        self.value_columns.extend(other.value_columns);
        self.value_labels.extend(other.value_labels);
        self.last_modified = self.last_modified.max(other.last_modified);
        self.messages.extend(other.messages);
    }

    /// Restricts the table to the given scenario columns. An empty selection keeps all.
    pub fn select_scenario_columns(&mut self, columns: &[String]) {
        if columns.is_empty() {
            return;
        }
        let keep = self.select_known(columns, true);
        for row in &mut self.rows {
            row.scenario.retain(|k, _| keep.contains(k));
        }
        self.scenario_columns = keep;
    }

    /// Restricts the table to the given value columns. An empty selection keeps all.
    pub fn select_value_columns(&mut self, columns: &[String]) {
        if columns.is_empty() {
            return;
        }
        let keep = self.select_known(columns, false);
        for row in &mut self.rows {
            row.values.retain(|k, _| keep.contains(k));
        }
        self.value_labels.retain(|k, _| keep.contains(k));
        self.value_columns = keep;
    }

    fn select_known(&mut self, columns: &[String], scenario: bool) -> BTreeSet<String> {
        let declared = if scenario {
            &self.scenario_columns
        } else {
            &self.value_columns
        };
        let (known, unknown): (Vec<&String>, Vec<&String>) =
            columns.iter().partition(|c| declared.contains(*c));
        let keep = known.into_iter().cloned().collect();

        if !unknown.is_empty() {
            let kind = if scenario { "scenario" } else { "value" };
            let names = unknown
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            self.messages.warn(
                format!("Unknown {kind} columns"),
                format!("selected {kind} columns not present in the logs: {names}"),
            );
        }
        keep
    }

    /// Adds a value column computed per row. Rows where `eval` yields nothing are left alone.
    pub fn add_derived_column<F>(&mut self, name: &str, eval: F)
    where
        F: Fn(&DataRow) -> Option<f64>,
    {
        for row in &mut self.rows {
            if let Some(v) = eval(row) {
                row.values.insert(name.to_string(), Value::Number(v));
            }
        }
        self.value_columns.insert(name.to_string());
    }

    pub fn headers(&self) -> (Vec<String>, Vec<String>) {
        (
            self.scenario_columns.iter().cloned().collect(),
            self.value_columns.iter().cloned().collect(),
        )
    }

    pub fn value_label<'a>(&'a self, column: &'a str) -> &'a str {
        self.value_labels
            .get(column)
            .map(String::as_str)
            .unwrap_or(column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataRow> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a DataTable {
    type Item = &'a DataRow;
    type IntoIter = std::slice::Iter<'a, DataRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
