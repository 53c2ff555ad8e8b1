//! Benchmark harness comparing the index structures.
//!
//! A run is described by a [`BenchConfig`]. Each iteration generates a fresh
//! seeded [`Workload`], builds every selected structure, times the phases the
//! benchmark kind asks for and records one sample per structure. The samples
//! are then summarised by [`report`].

pub mod config;
pub mod report;
pub mod runner;
pub mod workload;

pub use config::{BenchConfig, BenchmarkKind, KeyDistribution, Metric, SizeClass};
pub use report::Summary;
pub use runner::{BenchResults, Measurement, MemoryProbe, Runner};
pub use workload::Workload;
