use crate::model::LogRecord;
use crate::parse::error::ParseError;
use ahash::AHashMap;
use flate2::read::MultiGzDecoder;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const VALUE_PREFIX: &str = "value.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// One row per measurement: scenario columns plus `key` and `value`.
    Long,
    /// One row per iteration: scenario columns plus `value.<metric>` columns.
    Wide,
}

/// Works out which layout a header row describes.
pub fn detect_layout(path: &Path, headers: &[String]) -> Result<CsvLayout, ParseError> {
    let has_key_value = headers.iter().any(|h| h == "key") && headers.iter().any(|h| h == "value");
    let has_prefixed = headers.iter().any(|h| h.starts_with(VALUE_PREFIX));

    match (has_key_value, has_prefixed) {
        (true, false) => Ok(CsvLayout::Long),
        (false, true) => Ok(CsvLayout::Wide),
        (true, true) => Err(ParseError::CsvFormat {
            path: path.to_path_buf(),
            reason: "it has both 'key' and 'value' headers and headers that start with 'value.'"
                .to_string(),
        }),
        (false, false) => Err(ParseError::CsvFormat {
            path: path.to_path_buf(),
            reason: "it has neither 'key' and 'value' columns nor columns that start with \
                     'value.' (prefix value columns like 'value.bmtime')"
                .to_string(),
        }),
    }
}

/// Loads a long or wide format CSV (optionally gzip compressed) into records.
///
/// Empty scenario cells are treated as absent, which is how tabulated output
/// marks columns a record never had.
pub fn load_csv(log_id: &str, path: &Path) -> Result<Vec<LogRecord>, ParseError> {
    let file = File::open(path).map_err(|e| ParseError::read(path, e))?;
    let input: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = match detect_layout(path, &headers)? {
        CsvLayout::Long => load_long(path, &headers, &mut reader)?,
        CsvLayout::Wide => load_wide(path, &headers, &mut reader)?,
    };

    for record in &mut records {
        record
            .scenario
            .entry("log".to_string())
            .or_insert_with(|| log_id.to_string());
    }

    tracing::debug!(log = log_id, records = records.len(), "loaded CSV log");
    Ok(records)
}

fn load_long<R: Read>(
    path: &Path,
    headers: &[String],
    reader: &mut csv::Reader<R>,
) -> Result<Vec<LogRecord>, ParseError> {
    let key_idx = headers.iter().position(|h| h == "key");
    let value_idx = headers.iter().position(|h| h == "value");
    let (Some(key_idx), Some(value_idx)) = (key_idx, value_idx) else {
        return Ok(Vec::new());
    };

    let mut index: AHashMap<Vec<String>, usize> = AHashMap::new();
    let mut records: Vec<LogRecord> = Vec::new();
    let mut skipped = 0usize;

    for row in reader.records() {
        let row = row.map_err(|e| csv_error(path, e))?;
        if row.len() != headers.len() {
            skipped += 1;
            continue;
        }

        let scenario_cells: Vec<String> = row
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != key_idx && *i != value_idx)
            .map(|(_, cell)| cell.to_string())
            .collect();

        let slot = match index.get(&scenario_cells) {
            Some(slot) => *slot,
            None => {
                let scenario = headers
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != key_idx && *i != value_idx)
                    .zip(&scenario_cells)
                    .filter(|(_, cell)| !cell.is_empty())
                    .map(|((_, h), cell)| (h.clone(), cell.clone()))
                    .collect::<BTreeMap<_, _>>();
                records.push(LogRecord::new(scenario));
                index.insert(scenario_cells, records.len() - 1);
                records.len() - 1
            }
        };

        records[slot].push(&row[key_idx], &row[value_idx]);
    }

    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "skipped malformed CSV rows");
    }

    Ok(records)
}

fn load_wide<R: Read>(
    path: &Path,
    headers: &[String],
    reader: &mut csv::Reader<R>,
) -> Result<Vec<LogRecord>, ParseError> {
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row.map_err(|e| csv_error(path, e))?;
        let mut record = LogRecord::default();

        for (header, cell) in headers.iter().zip(row.iter()) {
            match header.strip_prefix(VALUE_PREFIX) {
                Some(metric) => {
                    if cell.trim().parse::<f64>().is_ok() {
                        record.push(metric, cell.trim());
                    }
                }
                None if !cell.is_empty() => {
                    record.scenario.insert(header.clone(), cell.to_string());
                }
                None => {}
            }
        }

        records.push(record);
    }

    Ok(records)
}

fn csv_error(path: &Path, source: csv::Error) -> ParseError {
    ParseError::Csv {
        path: path.to_path_buf(),
        source,
    }
}
