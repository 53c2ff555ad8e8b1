//! The common contract every benchmarked index structure implements, and the
//! registry of structures the harness can run.
//!
//! All structures store a set of `u32` keys and answer the same four
//! operations (construct, insert, find, find-range), so the harness can treat
//! them identically.

mod btree;
mod hash_table;
mod htrie;
mod mtrie;
mod sorted_list;
mod trie;

use std::fmt;
use std::str::FromStr;

pub use btree::BTree;
pub use hash_table::HashTable;
pub use htrie::HTrie;
pub use mtrie::MTrie;
pub use sorted_list::SortedList;
pub use trie::Trie;

use crate::art::Art;
use crate::error::ConfigError;

/// A set of `u32` keys.
///
/// Construction is `Default`; destruction is `Drop`.
pub trait IntIndex {
    /// Display name used in reports and on the command line.
    fn name(&self) -> &'static str;

    /// Insert `value`. Inserting an existing value does nothing.
    fn insert(&mut self, value: u32);

    /// Insert every value of `values`.
    fn insert_all(&mut self, values: &[u32]) {
        for &v in values {
            self.insert(v);
        }
    }

    fn find(&self, value: u32) -> bool;

    /// All stored values in `from..=to`, ascending. Empty if `from > to`.
    fn find_range(&self, from: u32, to: u32) -> Vec<u32>;

    /// Whether range queries are efficient enough to benchmark. Results are
    /// correct either way.
    fn supports_range(&self) -> bool {
        true
    }

    /// Number of distinct values stored.
    fn len(&self) -> usize;

    /// Heap bytes the structure accounts for itself, if it tracks them.
    fn heap_bytes(&self) -> Option<usize> {
        None
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IntIndex for Art {
    fn name(&self) -> &'static str {
        Structure::Art.name()
    }

    #[inline]
    fn insert(&mut self, value: u32) {
        Art::insert(self, value);
    }

    #[inline]
    fn find(&self, value: u32) -> bool {
        Art::find(self, value)
    }

    fn find_range(&self, from: u32, to: u32) -> Vec<u32> {
        Art::find_range(self, from, to)
    }

    fn len(&self) -> usize {
        Art::len(self)
    }

    fn heap_bytes(&self) -> Option<usize> {
        Some(self.stats().heap_bytes)
    }
}

/// The index structures the harness knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Structure {
    Art,
    Trie,
    MTrie,
    HTrie,
    SortedList,
    HashTable,
    BTree,
}

impl Structure {
    pub const ALL: [Structure; 7] = [
        Structure::Art,
        Structure::Trie,
        Structure::MTrie,
        Structure::HTrie,
        Structure::SortedList,
        Structure::HashTable,
        Structure::BTree,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Structure::Art => "ART",
            Structure::Trie => "Trie",
            Structure::MTrie => "M-Trie",
            Structure::HTrie => "H-Trie",
            Structure::SortedList => "Sorted List",
            Structure::HashTable => "Hash-Table",
            Structure::BTree => "B-Tree",
        }
    }

    /// Whether the structure takes part in range benchmarks.
    pub fn supports_range(self) -> bool {
        !matches!(self, Structure::HTrie | Structure::HashTable)
    }

    /// Construct an empty instance.
    pub fn build(self) -> Box<dyn IntIndex> {
        match self {
            Structure::Art => Box::new(Art::new()),
            Structure::Trie => Box::new(Trie::new()),
            Structure::MTrie => Box::new(MTrie::new()),
            Structure::HTrie => Box::new(HTrie::new()),
            Structure::SortedList => Box::new(SortedList::new()),
            Structure::HashTable => Box::new(HashTable::new()),
            Structure::BTree => Box::new(BTree::new()),
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Structure {
    type Err = ConfigError;

    /// Case-insensitive match on the display name; spaces, dashes and
    /// underscores are ignored, so `sorted_list` and `Sorted List` agree.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn normalize(s: &str) -> String {
            s.chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_'))
                .flat_map(char::to_lowercase)
                .collect()
        }

        let wanted = normalize(s);
        Structure::ALL
            .into_iter()
            .find(|st| normalize(st.name()) == wanted)
            .ok_or_else(|| ConfigError::UnknownStructure(s.trim().to_string()))
    }
}

/// Walk state shared by the trie range queries: whether the path so far
/// still equals the prefix of the lower / upper bound.
#[derive(Clone, Copy)]
pub(crate) struct Bounds {
    pub from: u32,
    pub to: u32,
    pub on_lower: bool,
    pub on_upper: bool,
}

impl Bounds {
    pub fn new(from: u32, to: u32) -> Self {
        Self {
            from,
            to,
            on_lower: true,
            on_upper: true,
        }
    }

    /// Inclusive byte window to visit at `depth`.
    pub fn window(self, depth: usize) -> (u8, u8) {
        let lo = if self.on_lower { crate::art::partial_key(self.from, depth) } else { 0 };
        let hi = if self.on_upper { crate::art::partial_key(self.to, depth) } else { u8::MAX };
        (lo, hi)
    }

    /// State after descending through `byte` at `depth`.
    pub fn descend(self, depth: usize, byte: u8) -> Self {
        let (lo, hi) = self.window(depth);
        Self {
            on_lower: self.on_lower && byte == lo,
            on_upper: self.on_upper && byte == hi,
            ..self
        }
    }
}

/// Place `byte` as the key byte at `depth` of `prefix`.
#[inline]
pub(crate) fn push_byte(prefix: u32, depth: usize, byte: u8) -> u32 {
    prefix | (u32::from(byte) << (8 * (crate::art::KEY_BYTES - 1 - depth)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_names_roundtrip() {
        for st in Structure::ALL {
            assert_eq!(st.name().parse::<Structure>().unwrap(), st);
            assert_eq!(st.build().name(), st.name());
            assert_eq!(st.build().supports_range(), st.supports_range());
        }
    }

    #[test]
    fn test_structure_parse_lenient() {
        assert_eq!("art".parse::<Structure>().unwrap(), Structure::Art);
        assert_eq!("sorted_list".parse::<Structure>().unwrap(), Structure::SortedList);
        assert_eq!(" hash-table ".parse::<Structure>().unwrap(), Structure::HashTable);
        assert_eq!("mtrie".parse::<Structure>().unwrap(), Structure::MTrie);
        assert!(matches!(
            "splay".parse::<Structure>(),
            Err(ConfigError::UnknownStructure(name)) if name == "splay"
        ));
    }

    #[test]
    fn test_heap_bytes_reported_by_node_structures() {
        for st in Structure::ALL {
            let mut index = st.build();
            index.insert_all(&[1, 0x0100_0000, 0xFFFF_FFFF]);
            let tracked = matches!(st, Structure::Art | Structure::Trie);
            assert_eq!(index.heap_bytes().is_some(), tracked, "{st}");
            if let Some(bytes) = index.heap_bytes() {
                assert!(bytes > 0, "{st}");
            }
        }
    }

    #[test]
    fn test_push_byte() {
        assert_eq!(push_byte(0, 0, 0xAB), 0xAB00_0000);
        assert_eq!(push_byte(0xAB00_0000, 3, 0x01), 0xAB00_0001);
    }

    #[test]
    fn test_bounds_window() {
        let b = Bounds::new(0x0102_0304, 0x0105_0000);
        assert_eq!(b.window(0), (0x01, 0x01));
        let b = b.descend(0, 0x01);
        assert_eq!(b.window(1), (0x02, 0x05));
        let inner = b.descend(1, 0x03);
        assert_eq!(inner.window(2), (0x00, 0xFF));
        let low_edge = b.descend(1, 0x02);
        assert_eq!(low_edge.window(2), (0x03, 0xFF));
    }
}
