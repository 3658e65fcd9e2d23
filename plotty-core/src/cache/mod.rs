mod error;
mod file;
mod memory;

#[cfg(test)]
mod tests;

pub use error::CacheError;
pub use file::FileCache;
pub use memory::MemoryCache;

/// Byte storage for pipeline stage results.
///
/// Stores are best-effort: a failed read is a miss and a failed write is
/// logged and forgotten.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    fn set(&self, key: &str, value: Vec<u8>);

    fn delete(&self, key: &str);
}
