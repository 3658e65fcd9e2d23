use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// The independent variables of a benchmark run, keyed by column name.
pub type Scenario = BTreeMap<String, ScenarioCell>;

/// A categorical scenario value that has been passed through a format style.
///
/// The raw `value` is what identifies the cell; everything else is presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioValue {
    pub value: String,
    pub display: String,
    pub index: i64,
    pub group: Option<String>,
    pub color: Option<String>,
}

/// A single scenario cell, either straight from a log or formatted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioCell {
    Raw(String),
    Styled(ScenarioValue),
}

impl ScenarioCell {
    pub fn raw(&self) -> &str {
        match self {
            ScenarioCell::Raw(v) => v,
            ScenarioCell::Styled(v) => &v.value,
        }
    }

    pub fn display(&self) -> &str {
        match self {
            ScenarioCell::Raw(v) => v,
            ScenarioCell::Styled(v) => &v.display,
        }
    }

    pub fn style_index(&self) -> Option<i64> {
        match self {
            ScenarioCell::Raw(_) => None,
            ScenarioCell::Styled(v) => Some(v.index),
        }
    }

    pub fn is_styled(&self) -> bool {
        matches!(self, ScenarioCell::Styled(_))
    }
}

impl From<&str> for ScenarioCell {
    fn from(value: &str) -> Self {
        ScenarioCell::Raw(value.to_string())
    }
}

impl From<String> for ScenarioCell {
    fn from(value: String) -> Self {
        ScenarioCell::Raw(value)
    }
}

impl PartialEq for ScenarioCell {
    fn eq(&self, other: &Self) -> bool {
        self.raw() == other.raw()
    }
}

impl Eq for ScenarioCell {}

impl Hash for ScenarioCell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw().hash(state);
    }
}

impl Display for ScenarioCell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display())
    }
}
