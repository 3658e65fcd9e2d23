pub mod fingerprint;
pub mod present;
pub mod serde_float;
pub mod stats;

#[cfg(test)]
mod tests;
