//! Ordered set backed by the standard library B-tree.

use std::collections::BTreeSet;

use super::{IntIndex, Structure};

#[derive(Debug, Clone, Default)]
pub struct BTree {
    values: BTreeSet<u32>,
}

impl BTree {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IntIndex for BTree {
    fn name(&self) -> &'static str {
        Structure::BTree.name()
    }

    fn insert(&mut self, value: u32) {
        self.values.insert(value);
    }

    fn find(&self, value: u32) -> bool {
        self.values.contains(&value)
    }

    fn find_range(&self, from: u32, to: u32) -> Vec<u32> {
        // BTreeSet::range panics on inverted bounds.
        if from > to {
            return Vec::new();
        }
        self.values.range(from..=to).copied().collect()
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}
