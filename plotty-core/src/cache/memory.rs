use crate::cache::CacheStore;
use dashmap::DashMap;

/// Process-local cache, shareable across threads.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, Vec<u8>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: Vec<u8>) {
        self.entries.insert(key.to_string(), value);
    }

    fn delete(&self, key: &str) {
        self.entries.remove(key);
    }
}
