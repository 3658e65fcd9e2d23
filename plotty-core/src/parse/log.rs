use crate::model::LogRecord;
use crate::parse::error::ParseError;
use crate::parse::filename::scenario_from_filename;
use crate::parse::patterns::{
    DATA_LINE, ERROR, FINISHED, HEADER_LINE, MMTK_BANNER, PASSED, SCENARIO, SKIP_FINISHED,
    STARTING, TABULATE_BANNER, TIMEDRUN, WARMUP,
};
use flate2::read::MultiGzDecoder;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::mem;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Idle,
    InInvocation,
    InTabulateHeader,
    InTabulateData,
    InMmtkHeader,
    InMmtkData,
    InError,
}

/// Turns benchmark logs into per-iteration records.
///
/// A parser is meant to be reused across one tabulation batch: once any file in
/// the batch carries inline scenario markers, every later flush in that batch
/// stops deriving the scenario from file names.
#[derive(Debug)]
pub struct LogParser {
    legacy: bool,
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser {
    pub fn new() -> Self {
        Self { legacy: true }
    }

    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    /// Parses a log file from disk, decompressing `.gz` files on the fly.
    pub fn parse_file(&mut self, log_id: &str, path: &Path) -> Result<Vec<LogRecord>, ParseError> {
        let file = File::open(path).map_err(|e| ParseError::read(path, e))?;
        let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(MultiGzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.parse(log_id, &file_name, BufReader::new(reader))
            .map_err(|e| ParseError::read(path, e))
    }

    /// Parses log text. `file_name` feeds the legacy scenario grammar.
    pub fn parse<R: BufRead>(
        &mut self,
        log_id: &str,
        file_name: &str,
        mut reader: R,
    ) -> std::io::Result<Vec<LogRecord>> {
        let mut run = FileRun::new(log_id, file_name);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            run.line(self, line);
        }

        Ok(run.finish(self))
    }
}

//-----------------------------------------------------------------------------
// Per-file state
//-----------------------------------------------------------------------------

struct FileRun<'a> {
    log_id: &'a str,
    file_name: &'a str,
    state: ParserState,
    iteration: u32,
    invocation: u32,
    scenario: BTreeMap<String, String>,
    values: Vec<(String, String)>,
    invocation_results: Vec<LogRecord>,
    results: Vec<LogRecord>,
    headers: Vec<String>,
    legacy_scenario: Option<BTreeMap<String, String>>,
}

impl<'a> FileRun<'a> {
    fn new(log_id: &'a str, file_name: &'a str) -> Self {
        Self {
            log_id,
            file_name,
            state: ParserState::Idle,
            iteration: 0,
            invocation: 0,
            scenario: BTreeMap::new(),
            values: Vec::new(),
            invocation_results: Vec::new(),
            results: Vec::new(),
            headers: Vec::new(),
            legacy_scenario: None,
        }
    }

    fn line(&mut self, parser: &mut LogParser, line: &str) {
        match self.state {
            ParserState::Idle => {
                if TIMEDRUN.is_match(line) {
                    self.state = ParserState::InInvocation;
                    self.start_invocation();
                }
            }
            ParserState::InInvocation => self.in_invocation(parser, line),
            ParserState::InError => {
                if TIMEDRUN.is_match(line) {
                    self.invocation_results.clear();
                    self.values.clear();
                    self.invocation += 1;
                    self.start_invocation();
                    self.state = ParserState::InInvocation;
                }
            }
            ParserState::InTabulateHeader | ParserState::InMmtkHeader => {
                if HEADER_LINE.is_match(line) {
                    self.headers = line.split_whitespace().map(str::to_string).collect();
                    self.state = if self.state == ParserState::InTabulateHeader {
                        ParserState::InTabulateData
                    } else {
                        ParserState::InMmtkData
                    };
                } else {
                    self.state = ParserState::InError;
                }
            }
            ParserState::InTabulateData | ParserState::InMmtkData => {
                self.stats_data(line);
            }
        }
    }

    fn in_invocation(&mut self, parser: &mut LogParser, line: &str) {
        if TIMEDRUN.is_match(line) {
            self.flush_iteration(parser);
            self.results.append(&mut self.invocation_results);
            self.invocation += 1;
            self.start_invocation();
            return;
        }

        if let Some(caps) = SCENARIO.captures(line) {
            parser.legacy = false;
            self.scenario.insert(caps[1].to_string(), caps[2].to_string());
            return;
        }

        if STARTING.is_match(line) {
            self.flush_iteration(parser);
            return;
        }

        if TABULATE_BANNER.is_match(line) {
            self.state = ParserState::InTabulateHeader;
            return;
        }

        if MMTK_BANNER.is_match(line) {
            self.state = ParserState::InMmtkHeader;
            return;
        }

        if let Some(msec) = completion_time(line) {
            if self.values.iter().any(|(k, _)| k == "bmtime") {
                self.flush_iteration(parser);
            }
            self.values.push(("bmtime".to_string(), msec));
            return;
        }

        if ERROR.is_match(line) {
            self.state = ParserState::InError;
        }
    }

    fn stats_data(&mut self, line: &str) {
        if !DATA_LINE.is_match(line) {
            self.state = ParserState::InError;
            return;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != self.headers.len() {
            self.state = ParserState::InError;
            return;
        }

        let mmtk = self.state == ParserState::InMmtkData;
        let mut total = Some(0.0);
        for (key, value) in self.headers.iter().zip(fields) {
            if mmtk && (key == "time.mu" || key == "time.gc") {
                match value.parse::<f64>() {
                    Ok(v) => total = total.map(|t| t + v),
                    Err(_) => {
                        tracing::warn!(%key, %value, "non-numeric MMTk time, not totalling");
                        total = None;
                    }
                }
            }
            self.values.push((key.clone(), value.to_string()));
        }
        if let (true, Some(total)) = (mmtk, total) {
            self.values.push(("time".to_string(), total.to_string()));
        }

        self.state = ParserState::InInvocation;
    }

    fn start_invocation(&mut self) {
        self.iteration = 0;
        self.scenario.clear();
        self.scenario
            .insert("iteration".to_string(), self.iteration.to_string());
    }

    /// Moves the pending iteration, if it measured anything, into the invocation's results.
    fn flush_iteration(&mut self, parser: &LogParser) {
        if self.values.is_empty() {
            return;
        }

        let mut scenario = self.scenario.clone();
        if parser.legacy {
            let legacy = self
                .legacy_scenario
                .get_or_insert_with(|| legacy_scenario(self.file_name));
            scenario.extend(legacy.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        scenario
            .entry("invocation".to_string())
            .or_insert_with(|| self.invocation.to_string());

        let mut scenario = normalize_keys(scenario);
        scenario.insert("log".to_string(), self.log_id.to_string());

        self.invocation_results.push(LogRecord {
            scenario,
            values: mem::take(&mut self.values),
        });

        self.iteration += 1;
        self.scenario
            .insert("iteration".to_string(), self.iteration.to_string());
    }

    fn finish(mut self, parser: &LogParser) -> Vec<LogRecord> {
        if self.state == ParserState::InInvocation {
            self.flush_iteration(parser);
            self.results.append(&mut self.invocation_results);
        }
        self.results
    }
}

fn completion_time(line: &str) -> Option<String> {
    if let Some(caps) = PASSED.captures(line) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = WARMUP.captures(line) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = FINISHED.captures(line) {
        if SKIP_FINISHED.is_match(line) {
            return None;
        }
        let secs: f64 = caps[1].parse().ok()?;
        return Some((secs * 1000.0).to_string());
    }
    None
}

fn legacy_scenario(file_name: &str) -> BTreeMap<String, String> {
    scenario_from_filename(file_name).unwrap_or_else(|| {
        tracing::warn!(file = file_name, "log name does not follow the legacy naming scheme");
        BTreeMap::new()
    })
}

/// Lower-cases scenario keys and replaces anything outside `[a-z0-9_]` with `_`.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn normalize_keys(scenario: BTreeMap<String, String>) -> BTreeMap<String, String> {
    scenario
        .into_iter()
        .map(|(k, v)| (normalize_key(&k), v))
        .collect()
}
