//! Sorted, deduplicated vector with binary search.
//!
//! Also serves as the reference structure when the harness verifies results.

use super::{IntIndex, Structure};

#[derive(Debug, Clone, Default)]
pub struct SortedList {
    values: Vec<u32>,
}

impl SortedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.values
    }
}

impl IntIndex for SortedList {
    fn name(&self) -> &'static str {
        Structure::SortedList.name()
    }

    fn insert(&mut self, value: u32) {
        if let Err(pos) = self.values.binary_search(&value) {
            self.values.insert(pos, value);
        }
    }

    /// Bulk load: append, then sort and deduplicate once.
    fn insert_all(&mut self, values: &[u32]) {
        self.values.extend_from_slice(values);
        self.values.sort_unstable();
        self.values.dedup();
    }

    fn find(&self, value: u32) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    fn find_range(&self, from: u32, to: u32) -> Vec<u32> {
        if from > to {
            return Vec::new();
        }
        let start = self.values.partition_point(|&v| v < from);
        let end = self.values.partition_point(|&v| v <= to);
        self.values[start..end].to_vec()
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}
