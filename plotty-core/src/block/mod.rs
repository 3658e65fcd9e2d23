pub mod builtin;
pub mod core;

#[cfg(test)]
mod tests;

pub use self::core::errors::{BlockDecodeError, BlockError};
pub use self::core::registry::BlockRegistry;
pub use self::core::result::{BlockOutput, ColumnStats, GraphKind, GraphOutput, GraphRow};
pub use self::core::spec::BlockSpec;
pub use self::core::{Block, BlockContext, BlockKind};
