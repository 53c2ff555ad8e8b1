//! Fixed-fanout byte trie.
//!
//! Three levels of 256-way child arrays, one per leading key byte, and a
//! 256-bit bitmap for the last byte. Every path is allocated at full width,
//! so the structure is fast but very memory hungry for sparse keys.

use super::{push_byte, Bounds, IntIndex, Structure};
use crate::art::{partial_key, KEY_BYTES};

const FANOUT: usize = 256;
const LAST: usize = KEY_BYTES - 1;

enum Level {
    Inner(Box<[Option<Box<Level>>; FANOUT]>),
    Bottom(Box<[u64; FANOUT / 64]>),
}

impl Level {
    fn new(depth: usize) -> Self {
        if depth == LAST {
            Level::Bottom(Box::new([0; FANOUT / 64]))
        } else {
            Level::Inner(Box::new(std::array::from_fn(|_| None)))
        }
    }

    fn heap_bytes(&self) -> usize {
        match self {
            Level::Inner(children) => {
                std::mem::size_of::<[Option<Box<Level>>; FANOUT]>()
                    + children.iter().flatten().map(|c| c.heap_bytes()).sum::<usize>()
            }
            Level::Bottom(_) => std::mem::size_of::<[u64; FANOUT / 64]>(),
        }
    }
}

#[inline]
fn bit(bits: &[u64; FANOUT / 64], byte: u8) -> bool {
    bits[byte as usize / 64] & (1u64 << (byte % 64)) != 0
}

pub struct Trie {
    root: Level,
    len: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self {
            root: Level::new(0),
            len: 0,
        }
    }

    fn collect(level: &Level, depth: usize, prefix: u32, bounds: Bounds, out: &mut Vec<u32>) {
        let (lo, hi) = bounds.window(depth);
        match level {
            Level::Inner(children) => {
                for byte in lo..=hi {
                    if let Some(child) = &children[byte as usize] {
                        let path = push_byte(prefix, depth, byte);
                        Self::collect(child, depth + 1, path, bounds.descend(depth, byte), out);
                    }
                }
            }
            Level::Bottom(bits) => {
                out.extend((lo..=hi).filter(|&b| bit(bits, b)).map(|b| push_byte(prefix, depth, b)));
            }
        }
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl IntIndex for Trie {
    fn name(&self) -> &'static str {
        Structure::Trie.name()
    }

    fn insert(&mut self, value: u32) {
        let mut level = &mut self.root;
        for depth in 0..LAST {
            level = match level {
                Level::Inner(children) => {
                    let byte = partial_key(value, depth) as usize;
                    &mut **children[byte].get_or_insert_with(|| Box::new(Level::new(depth + 1)))
                }
                Level::Bottom(_) => unreachable!("bitmap level above the last key byte"),
            };
        }
        if let Level::Bottom(bits) = level {
            let byte = partial_key(value, LAST);
            let mask = 1u64 << (byte % 64);
            let word = &mut bits[byte as usize / 64];
            if *word & mask == 0 {
                *word |= mask;
                self.len += 1;
            }
        }
    }

    fn find(&self, value: u32) -> bool {
        let mut level = &self.root;
        for depth in 0..KEY_BYTES {
            match level {
                Level::Inner(children) => match &children[partial_key(value, depth) as usize] {
                    Some(child) => level = &**child,
                    None => return false,
                },
                Level::Bottom(bits) => return bit(bits, partial_key(value, depth)),
            }
        }
        false
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

    fn heap_bytes(&self) -> Option<usize> {
        Some(self.root.heap_bytes())
    }
}
