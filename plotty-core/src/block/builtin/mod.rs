pub mod aggregate;
pub mod composite;
pub mod filter;
pub mod format;
pub mod graph;
pub mod normalize;
pub mod value_filter;
