//! Separators of the pipeline text encoding, outermost first.
//!
//! `flags | logs&scenarios&values&derived | block | block ...`

pub const BLOCK: char = '|';
pub const GROUP: char = '&';
pub const PARAM: char = '^';
pub const TUPLE: char = ';';

pub fn split_groups(text: &str) -> Vec<&str> {
    text.split(GROUP).collect()
}

/// Splits on `^`, dropping empty entries.
pub fn split_params(text: &str) -> Vec<&str> {
    text.split(PARAM).filter(|s| !s.is_empty()).collect()
}

pub fn join_params<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(&PARAM.to_string())
}
