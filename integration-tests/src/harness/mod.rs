pub mod source;
pub mod tracing;
pub mod workspace;

pub use source::CountingSource;
pub use tracing::{CapturedEvent, capture_events, init_test_tracing};
pub use workspace::{TestWorkspace, passed_log};
