use crate::block::{BlockContext, BlockOutput};
use crate::cache::CacheStore;
use crate::model::{DataTable, Value};
use crate::parse::{TabulationStatus, read_status};
use crate::pipeline::{Ambiguity, Pipeline, PipelineError, PipelineOutput};
use crate::source::{LogSource, SourceError};
use crate::style::StyleStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Bumped whenever the serialized form of a stage result changes.
pub const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Deserialize)]
struct CacheEntry {
    last_modified: DateTime<Utc>,
    output: PipelineOutput,
}

#[derive(Serialize)]
struct CacheEntryRef<'a> {
    last_modified: DateTime<Utc>,
    output: &'a PipelineOutput,
}

/// Runs pipelines against a log source, caching the result of every stage.
pub struct Engine<'a> {
    cache: &'a dyn CacheStore,
    source: &'a dyn LogSource,
    styles: &'a dyn StyleStore,
    confidence: f64,
}

impl<'a> Engine<'a> {
    pub fn new(
        cache: &'a dyn CacheStore,
        source: &'a dyn LogSource,
        styles: &'a dyn StyleStore,
        confidence: f64,
    ) -> Self {
        Self {
            cache,
            source,
            styles,
            confidence,
        }
    }

    /// Executes `pipeline`, resuming from the longest fresh cached prefix.
    ///
    /// A block that cannot decide between rows yields
    /// [`PipelineError::Ambiguity`] carrying the output of every block before it.
    pub fn apply(&self, pipeline: &Pipeline) -> Result<PipelineOutput, PipelineError> {
        if pipeline.logs.is_empty() {
            return Err(PipelineError::NoLogs);
        }

        let threshold = self.last_modified(&pipeline.logs)?;
        let keys: Vec<String> = pipeline
            .stage_keys()
            .iter()
            .map(|k| self.cache_key(k))
            .collect();

        let (start, mut output) = match self.lookup(&keys, threshold) {
            Some(hit) => hit,
            None => {
                let output = PipelineOutput {
                    table: self.load(pipeline)?,
                    graphs: Vec::new(),
                };
                self.store(&keys[0], threshold, &output);
                (0, output)
            }
        };

        let ctx = BlockContext {
            styles: self.styles,
            confidence: self.confidence,
        };

        for (index, block) in pipeline.blocks.iter().enumerate().skip(start) {
            let started = Instant::now();
            match block.apply(&mut output.table, &ctx) {
                Ok(BlockOutput::Continue) => {}
                Ok(BlockOutput::Graphs(graphs)) => output.graphs.extend(graphs),
                Err(e) if e.is_ambiguity() => {
                    return Err(self.recover(pipeline, index, e.to_string()));
                }
                Err(source) => {
                    return Err(PipelineError::Block {
                        index,
                        name: block.kind().name(),
                        source,
                    });
                }
            }
            tracing::debug!(
                index,
                block = %block.kind(),
                rows = output.table.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "block finished"
            );
            self.store(&keys[index + 1], threshold, &output);
        }

        Ok(output)
    }

    /// Re-runs the pipeline without block `block` onwards.
    ///
    /// Every block before `block` already succeeded, so the shorter run
    /// cannot come back here.
    fn recover(&self, pipeline: &Pipeline, block: usize, message: String) -> PipelineError {
        tracing::info!(block, %message, "ambiguous block, returning the preceding output");
        match self.apply(&pipeline.truncated(block)) {
            Ok(recovered) => PipelineError::Ambiguity(Box::new(Ambiguity {
                block,
                message,
                recovered,
            })),
            Err(e) => e,
        }
    }

    fn last_modified(&self, logs: &[String]) -> Result<DateTime<Utc>, PipelineError> {
        let mut latest = DateTime::<Utc>::UNIX_EPOCH;
        for log in logs {
            latest = latest.max(self.source.modified(log).map_err(load_error)?);
        }
        Ok(latest)
    }

    fn load(&self, pipeline: &Pipeline) -> Result<DataTable, PipelineError> {
        let mut table = DataTable::new();
        for log in &pipeline.logs {
            let started = Instant::now();
            let loaded = self.source.load(log).map_err(load_error)?;
            tracing::debug!(
                log = %log,
                rows = loaded.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "loaded log"
            );
            table.merge(loaded);
        }

        table.select_scenario_columns(&pipeline.scenario_columns);
        table.select_value_columns(&pipeline.value_columns);

        for derived in &pipeline.derived {
            table.add_derived_column(&derived.text, |row| {
                derived
                    .expr
                    .eval(&|name| row.values.get(name).map(Value::value))
            });
        }

        Ok(table)
    }

    //-------------------------------------------------------------------------
    // Cache
    //-------------------------------------------------------------------------

    fn cache_key(&self, stage_key: &str) -> String {
        format!("v{CACHE_FORMAT_VERSION}:{}:{stage_key}", self.confidence)
    }

    /// Longest fresh cached stage, as `(blocks already applied, output)`.
    ///
    /// Stale and unreadable entries met on the way are deleted.
    fn lookup(
        &self,
        keys: &[String],
        threshold: DateTime<Utc>,
    ) -> Option<(usize, PipelineOutput)> {
        for (stage, key) in keys.iter().enumerate().rev() {
            let Some(bytes) = self.cache.get(key) else {
                continue;
            };
            match serde_json::from_slice::<CacheEntry>(&bytes) {
                Ok(entry) if entry.last_modified >= threshold => {
                    tracing::debug!(stage, "cache hit");
                    return Some((stage, entry.output));
                }
                Ok(entry) => {
                    tracing::debug!(
                        stage,
                        cached = %entry.last_modified,
                        modified = %threshold,
                        "evicting stale cache entry"
                    );
                    self.cache.delete(key);
                }
                Err(e) => {
                    tracing::warn!(stage, error = %e, "evicting unreadable cache entry");
                    self.cache.delete(key);
                }
            }
        }
        tracing::debug!("cache miss");
        None
    }

    fn store(&self, key: &str, last_modified: DateTime<Utc>, output: &PipelineOutput) {
        let entry = CacheEntryRef {
            last_modified,
            output,
        };
        match serde_json::to_vec(&entry) {
            Ok(bytes) => self.cache.set(key, bytes),
            Err(e) => tracing::warn!(error = %e, "failed to serialize stage result"),
        }
    }
}

fn load_error(e: SourceError) -> PipelineError {
    match e {
        SourceError::InProgress {
            log,
            pid,
            status_file,
        } => PipelineError::TabulationInProgress {
            log,
            pid,
            status_file,
        },
        other => PipelineError::Load(other),
    }
}

/// Progress of the background tabulation writing `status_file`.
pub fn tabulation_status(status_file: &Path) -> Result<TabulationStatus, PipelineError> {
    read_status(status_file)
        .map_err(SourceError::from)
        .map_err(PipelineError::Load)
}
