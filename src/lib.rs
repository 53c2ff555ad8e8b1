//! # art32
//!
//! An Adaptive Radix Tree (ART) over 32-bit unsigned keys, and a benchmark
//! harness comparing it against other integer index structures.
//!
//! Based on "The Adaptive Radix Tree: ARTful Indexing for Main-Memory
//! Databases" (ICDE 2013, Leis et al.)
//!
//! A key is split into four bytes, most significant first, one per tree
//! level. Inner nodes come in four sizes (4, 16, 48 and 256 children) and grow
//! from one to the next as they fill. A key that is unique below some prefix is
//! stored as a leaf right where the paths diverge, so sparse keys do not pay
//! for a full-depth chain of nodes.
//!
//! ## Example
//!
//! ```rust
//! use art32::Art;
//!
//! let mut tree = Art::new();
//! for key in [42, 7, 0xDEAD_BEEF, 7] {
//!     tree.insert(key);
//! }
//!
//! assert_eq!(tree.len(), 3);
//! assert!(tree.find(42));
//! assert!(!tree.find(43));
//! assert_eq!(tree.find_range(0, 100), vec![7, 42]);
//! ```
//!
//! ## Comparing structures
//!
//! Every structure implements [`IntIndex`], so they can be driven uniformly:
//!
//! ```rust
//! use art32::{IntIndex, Structure};
//!
//! for structure in Structure::ALL {
//!     let mut index = structure.build();
//!     index.insert_all(&[3, 1, 2]);
//!     assert_eq!(index.find_range(1, 2), vec![1, 2]);
//! }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

#[macro_use]
mod trace_helpers;

pub mod arena;
pub mod art;
pub mod bench;
pub mod error;
pub mod index;
pub mod slot;

pub use arena::{NodeArena, TierCounts};
pub use art::{Art, ArtStats, NodeType};
pub use error::{BenchError, ConfigError};
pub use index::{BTree, HTrie, HashTable, IntIndex, MTrie, SortedList, Structure, Trie};
pub use slot::{NodeId, Slot};

#[cfg(test)]
mod proptests;
