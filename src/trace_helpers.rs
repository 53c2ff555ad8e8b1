//! Zero-cost tracing helpers for the tree's hot paths.
//!
//! When the `node-trace` feature is enabled, these macros forward to the
//! `tracing` crate. When disabled (default), they compile to nothing, so the
//! insert and lookup loops carry no logging overhead in benchmarks.
//!
//! ```bash
//! RUST_LOG=art32::art=trace cargo run --release --features node-trace --bin art-bench -- -b insert -s 1
//! ```

#![allow(unused_macros)]

/// Trace-level logging (most verbose). Compiles to no-op without `node-trace`.
#[cfg(feature = "node-trace")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "node-trace"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level logging. Compiles to no-op without `node-trace`.
#[cfg(feature = "node-trace")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "node-trace"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}
