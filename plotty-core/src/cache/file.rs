use crate::cache::{CacheError, CacheStore};
use crate::util::fingerprint::digest;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Cache entries as gzip files named by the SHA-256 of their key.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json.gz", digest(key)))
    }

    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, CacheError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::Read {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let mut bytes = Vec::new();
        GzDecoder::new(file)
            .read_to_end(&mut bytes)
            .map_err(|e| CacheError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Some(bytes))
    }

    fn write(&self, path: &Path, value: &[u8]) -> Result<(), CacheError> {
        let write_err = |e: std::io::Error| CacheError::Write {
            path: path.to_path_buf(),
            source: e,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;
        let tmp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        let mut encoder = GzEncoder::new(tmp, Compression::fast());
        encoder.write_all(value).map_err(write_err)?;
        let tmp = encoder.finish().map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.path_for(key);
        match self.read(&path) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable cache entry, treating as a miss");
                None
            }
        }
    }

    fn set(&self, key: &str, value: Vec<u8>) {
        let path = self.path_for(key);
        if let Err(e) = self.write(&path, &value) {
            tracing::warn!(error = %e, "failed to store cache entry");
        }
    }

    fn delete(&self, key: &str) {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to delete cache entry"),
        }
    }
}
