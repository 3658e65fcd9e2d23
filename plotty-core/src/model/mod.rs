mod aggregate;
mod messages;
mod record;
mod row;
mod scenario;
mod table;

#[cfg(test)]
mod tests;

pub use aggregate::{AggregateKind, DataAggregate, Summary, geomean, safe_div};
pub use messages::Messages;
pub use record::LogRecord;
pub use row::{DataRow, Value};
pub use scenario::{Scenario, ScenarioCell, ScenarioValue};
pub use table::DataTable;
