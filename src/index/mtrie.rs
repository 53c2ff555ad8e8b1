//! Byte trie with ordered-map children.
//!
//! Each node keeps only the children that exist, in a `BTreeMap` keyed by the
//! partial key byte. A stored key is a path of four bytes; nodes at the last
//! level have no children.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::{push_byte, Bounds, IntIndex, Structure};
use crate::art::{partial_key, KEY_BYTES};

#[derive(Default)]
struct MNode {
    children: BTreeMap<u8, MNode>,
}

#[derive(Default)]
pub struct MTrie {
    root: MNode,
    len: usize,
}

impl MTrie {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect(node: &MNode, depth: usize, prefix: u32, bounds: Bounds, out: &mut Vec<u32>) {
        let (lo, hi) = bounds.window(depth);
        for (&byte, child) in node.children.range(lo..=hi) {
            let path = push_byte(prefix, depth, byte);
            if depth + 1 == KEY_BYTES {
                out.push(path);
            } else {
                Self::collect(child, depth + 1, path, bounds.descend(depth, byte), out);
            }
        }
    }
}

impl IntIndex for MTrie {
    fn name(&self) -> &'static str {
        Structure::MTrie.name()
    }

    fn insert(&mut self, value: u32) {
        let mut node = &mut self.root;
        for depth in 0..KEY_BYTES - 1 {
            node = node.children.entry(partial_key(value, depth)).or_default();
        }
        if let Entry::Vacant(slot) = node.children.entry(partial_key(value, KEY_BYTES - 1)) {
            slot.insert(MNode::default());
            self.len += 1;
        }
    }

    fn find(&self, value: u32) -> bool {
        let mut node = &self.root;
        for depth in 0..KEY_BYTES {
            match node.children.get(&partial_key(value, depth)) {
                Some(child) => node = child,
                None => return false,
            }
        }
        true
    }

    fn find_range(&self, from: u32, to: u32) -> Vec<u32> {
        let mut out = Vec::new();
        if from <= to {
            Self::collect(&self.root, 0, 0, Bounds::new(from, to), &mut out);
        }
        out
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_not_a_key() {
        let mut trie = MTrie::new();
        trie.insert(0x0102_0304);
        assert!(trie.find(0x0102_0304));
        assert!(!trie.find(0x0102_0300));
        assert!(!trie.find(0x0102_0000));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_range_sorted() {
        let mut trie = MTrie::new();
        trie.insert_all(&[900, 5, 70_000, 5, 1 << 30]);
        assert_eq!(trie.len(), 4);
        assert_eq!(trie.find_range(0, u32::MAX), vec![5, 900, 70_000, 1 << 30]);
        assert_eq!(trie.find_range(6, 70_000), vec![900, 70_000]);
    }
}
