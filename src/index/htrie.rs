//! Byte trie stored in a single hash map.
//!
//! Nodes are plain integers. An edge from node `n` under byte `b` is the map
//! entry `(n << 8 | b) -> child`. Edges under the last key byte point at
//! [`TERMINAL`] and mark a stored key. Range queries have to probe every byte
//! of every visited node, so the harness leaves this structure out of range
//! runs.

use std::collections::HashMap;

use super::{push_byte, Bounds, IntIndex, Structure};
use crate::art::{partial_key, KEY_BYTES};

const ROOT: u32 = 0;
const TERMINAL: u32 = u32::MAX;

#[inline]
fn edge(node: u32, byte: u8) -> u64 {
    (u64::from(node) << 8) | u64::from(byte)
}

pub struct HTrie {
    edges: HashMap<u64, u32>,
    next_node: u32,
    len: usize,
}

impl HTrie {
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
            next_node: ROOT + 1,
            len: 0,
        }
    }

    fn collect(&self, node: u32, depth: usize, prefix: u32, bounds: Bounds, out: &mut Vec<u32>) {
        let (lo, hi) = bounds.window(depth);
        for byte in lo..=hi {
            let Some(&child) = self.edges.get(&edge(node, byte)) else {
                continue;
            };
            let path = push_byte(prefix, depth, byte);
            if depth + 1 == KEY_BYTES {
                out.push(path);
            } else {
                self.collect(child, depth + 1, path, bounds.descend(depth, byte), out);
            }
        }
    }
}

impl Default for HTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl IntIndex for HTrie {
    fn name(&self) -> &'static str {
        Structure::HTrie.name()
    }

    fn insert(&mut self, value: u32) {
        let mut node = ROOT;
        for depth in 0..KEY_BYTES - 1 {
            let next = self.next_node;
            let child = *self.edges.entry(edge(node, partial_key(value, depth))).or_insert(next);
            if child == next {
                self.next_node += 1;
            }
            node = child;
        }
        let last = edge(node, partial_key(value, KEY_BYTES - 1));
        if self.edges.insert(last, TERMINAL).is_none() {
            self.len += 1;
        }
    }

    fn find(&self, value: u32) -> bool {
        let mut node = ROOT;
        for depth in 0..KEY_BYTES {
            match self.edges.get(&edge(node, partial_key(value, depth))) {
                Some(&child) => node = child,
                None => return false,
            }
        }
        true
    }

    fn find_range(&self, from: u32, to: u32) -> Vec<u32> {
        let mut out = Vec::new();
        if from <= to {
            self.collect(ROOT, 0, 0, Bounds::new(from, to), &mut out);
        }
        out
    }

    fn supports_range(&self) -> bool {
        false
    }

    fn len(&self) -> usize {
        self.len
    }
}
