use crate::model::Scenario;
use sha2::{Digest, Sha256};

const KEY_SEP: char = '\u{1f}';
const ENTRY_SEP: char = '\u{1e}';

/// Which scenario columns take part in a fingerprint.
#[derive(Debug, Clone, Copy)]
pub enum Columns<'a, S: AsRef<str>> {
    All,
    Exclude(&'a [S]),
    Include(&'a [S]),
}

/// Deterministic identity of a scenario, using raw values only.
///
/// Scenarios are ordered maps so the same scenario always fingerprints the same,
/// regardless of how its columns were inserted.
pub fn fingerprint<S: AsRef<str>>(scenario: &Scenario, columns: Columns<'_, S>) -> String {
    let mut out = String::new();
    for (key, cell) in scenario {
        let keep = match columns {
            Columns::All => true,
            Columns::Exclude(cols) => !cols.iter().any(|c| c.as_ref() == key),
            Columns::Include(cols) => cols.iter().any(|c| c.as_ref() == key),
        };
        if keep {
            out.push_str(key);
            out.push(KEY_SEP);
            out.push_str(cell.raw());
            out.push(ENTRY_SEP);
        }
    }
    out
}

pub fn fingerprint_all(scenario: &Scenario) -> String {
    fingerprint::<&str>(scenario, Columns::All)
}

/// Hex SHA-256 of arbitrary text, used to turn long keys into file-safe names.
pub fn digest(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}
