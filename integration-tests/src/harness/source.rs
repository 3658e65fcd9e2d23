use chrono::{DateTime, Utc};
use plotty_core::model::DataTable;
use plotty_core::source::{LogSource, SourceError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Wraps a log source and counts how often logs are actually loaded.
pub struct CountingSource<S> {
    inner: S,
    loads: AtomicUsize,
}

impl<S: LogSource> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl<S: LogSource> LogSource for CountingSource<S> {
    fn modified(&self, log: &str) -> Result<DateTime<Utc>, SourceError> {
        self.inner.modified(log)
    }

    fn load(&self, log: &str) -> Result<DataTable, SourceError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(log)
    }
}
