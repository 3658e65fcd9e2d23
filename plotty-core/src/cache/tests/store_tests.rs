use crate::cache::{CacheStore, FileCache, MemoryCache};
use std::fs;
use tempfile::tempdir;

fn exercise(store: &dyn CacheStore) {
    assert_eq!(store.get("1|run1&&&"), None);

    store.set("1|run1&&&", b"first".to_vec());
    store.set("1|run1&&&", b"second".to_vec());
    assert_eq!(store.get("1|run1&&&").as_deref(), Some(&b"second"[..]));

    store.delete("1|run1&&&");
    store.delete("1|run1&&&");
    assert_eq!(store.get("1|run1&&&"), None);
}

#[test]
fn memory_cache_stores_and_forgets() {
    let cache = MemoryCache::new();

    exercise(&cache);

    assert!(cache.is_empty());
}

#[test]
fn file_cache_stores_and_forgets() {
    let dir = tempdir().unwrap();

    exercise(&FileCache::new(dir.path().join("cache")));
}

#[test]
fn file_cache_names_entries_by_digest() {
    // Arrange
    let dir = tempdir().unwrap();
    let cache = FileCache::new(dir.path());

    // Act
    cache.set("a key with | and & in it", b"{}".to_vec());

    // Assert
    let path = cache.path_for("a key with | and & in it");
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(path.is_file());
    assert_eq!(name.len(), 64 + ".json.gz".len());
    assert_ne!(path, cache.path_for("another key"));
}

#[test]
fn corrupt_file_entries_read_as_misses() {
    // Arrange
    let dir = tempdir().unwrap();
    let cache = FileCache::new(dir.path());
    fs::write(cache.path_for("k"), b"not gzip").unwrap();

    // Act
    let value = cache.get("k");

    // Assert
    assert_eq!(value, None);
}

#[test]
fn concurrent_writers_of_one_key_leave_a_single_readable_entry() {
    // Arrange
    let dir = tempdir().unwrap();
    let cache = FileCache::new(dir.path());

    // Act
    std::thread::scope(|s| {
        for n in 0..8u8 {
            let cache = &cache;
            s.spawn(move || {
                for _ in 0..20 {
                    cache.set("shared", vec![n; 256]);
                }
            });
        }
    });

    // Assert
    let value = cache.get("shared").unwrap();
    assert_eq!(value.len(), 256);
    assert!(value.iter().all(|b| *b == value[0]));
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}
