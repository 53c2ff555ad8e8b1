//! Unordered hash set. Range queries scan every key.

use std::collections::HashSet;

use super::{IntIndex, Structure};

#[derive(Debug, Clone, Default)]
pub struct HashTable {
    values: HashSet<u32>,
}

impl HashTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IntIndex for HashTable {
    fn name(&self) -> &'static str {
        Structure::HashTable.name()
    }

    fn insert(&mut self, value: u32) {
        self.values.insert(value);
    }

    fn insert_all(&mut self, values: &[u32]) {
        self.values.reserve(values.len());
        self.values.extend(values.iter().copied());
    }

    fn find(&self, value: u32) -> bool {
        self.values.contains(&value)
    }

    fn find_range(&self, from: u32, to: u32) -> Vec<u32> {
        let mut out: Vec<u32> = self.values.iter().copied().filter(|v| (from..=to).contains(v)).collect();
        out.sort_unstable();
        out
    }

    fn supports_range(&self) -> bool {
        false
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}
