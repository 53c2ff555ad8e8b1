//! Errors raised by the benchmark harness. The index structures themselves
//! have no failure modes.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("iterations must be within 1..=10000, got {0}")]
    InvalidIterations(u32),
    #[error("size class must be 1, 2 or 3, got {0}")]
    InvalidSize(u8),
    #[error("key count must be at least 1, and at most 2^32 for dense keys")]
    InvalidKeyCount,
    #[error("unknown data structure: {0:?}")]
    UnknownStructure(String),
    #[error("no data structure selected")]
    NoStructures,
    #[error("none of the selected data structures supports range search")]
    NoRangeStructures,
    #[error("memory metric requested without an allocation probe")]
    NoMemoryProbe,
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{structure} disagrees with the reference: {detail}")]
    Mismatch { structure: &'static str, detail: String },
}
