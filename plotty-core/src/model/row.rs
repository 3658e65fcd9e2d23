use crate::model::aggregate::{DataAggregate, safe_div};
use crate::model::scenario::{Scenario, ScenarioCell};
use crate::util::serde_float;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A metric cell: a plain measurement or an aggregate over several of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Number(#[serde(with = "serde_float")] f64),
    Aggregate(DataAggregate),
}

impl Value {
    pub fn value(&self) -> f64 {
        match self {
            Value::Number(v) => *v,
            Value::Aggregate(agg) => agg.value(),
        }
    }

    /// Confidence bounds, falling back to `(value, value)` where none are defined.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Value::Number(v) => (*v, *v),
            Value::Aggregate(agg) => {
                let (lo, hi) = agg.ci();
                if lo.is_nan() || hi.is_nan() {
                    let v = agg.value();
                    (v, v)
                } else {
                    (lo, hi)
                }
            }
        }
    }

    pub fn has_ci(&self) -> bool {
        match self {
            Value::Number(_) => false,
            Value::Aggregate(agg) => !agg.ci().0.is_nan(),
        }
    }

    pub fn as_aggregate(&self) -> Option<&DataAggregate> {
        match self {
            Value::Aggregate(agg) => Some(agg),
            Value::Number(_) => None,
        }
    }

    /// Divides using aggregate semantics wherever either side is an aggregate.
    pub fn divide(&self, divisor: &Value) -> Value {
        match (self, divisor) {
            (Value::Number(a), Value::Number(b)) => Value::Number(safe_div(*a, *b)),
            (Value::Aggregate(a), Value::Aggregate(b)) => Value::Aggregate(a.div(b)),
            (Value::Aggregate(a), Value::Number(b)) => Value::Aggregate(a.div_scalar(*b)),
            (Value::Number(a), Value::Aggregate(b)) => {
                Value::Aggregate(DataAggregate::scalar_div(*a, b))
            }
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Aggregate(agg) => write!(f, "{agg}"),
        }
    }
}

/// One observation: its scenario and the metrics measured under it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataRow {
    pub scenario: Scenario,
    pub values: BTreeMap<String, Value>,
}

impl DataRow {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            values: BTreeMap::new(),
        }
    }

    pub fn raw(&self, column: &str) -> Option<&str> {
        self.scenario.get(column).map(ScenarioCell::raw)
    }

    pub fn has_all(&self, columns: &[String]) -> bool {
        columns.iter().all(|c| self.scenario.contains_key(c))
    }
}
