//! Debug utilities for ART troubleshooting.

use std::fmt::Write;

use super::node::{LayoutView, NODE48_ABSENT};
use super::{partial_key, Art, NodeType, KEY_BYTES};
use crate::arena::TierCounts;
use crate::slot::{NodeId, Slot};

/// Shape and memory statistics for an [`Art`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtStats {
    /// Live nodes per tier.
    pub nodes: TierCounts,
    /// Number of leaf slots (equals the number of keys).
    pub leaves: usize,
    /// Level of the deepest leaf, 1-based (0 for an empty tree).
    pub max_depth: usize,
    /// Approximate heap bytes held by the node pool.
    pub heap_bytes: usize,
}

impl ArtStats {
    pub fn bytes_per_key(&self) -> f64 {
        if self.leaves == 0 {
            0.0
        } else {
            self.heap_bytes as f64 / self.leaves as f64
        }
    }
}

impl Art {
    pub fn stats(&self) -> ArtStats {
        let mut stats = ArtStats {
            nodes: self.arena().live_counts(),
            heap_bytes: self.arena().heap_bytes(),
            ..ArtStats::default()
        };
        self.collect_stats(self.root(), 0, &mut stats);
        stats
    }

    fn collect_stats(&self, id: NodeId, depth: usize, stats: &mut ArtStats) {
        self.arena().get(id).for_each_in(0, u8::MAX, |_, slot| match slot {
            Slot::Leaf(_) => {
                stats.leaves += 1;
                stats.max_depth = stats.max_depth.max(depth + 1);
            }
            Slot::Child(child) => self.collect_stats(child, depth + 1, stats),
            Slot::Empty => {}
        });
    }

    /// Render the tree structure, one node or leaf per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== ART ({} keys) ===", self.len());
        self.dump_node(self.root(), 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let node = self.arena().get(id);
        let _ = writeln!(out, "{indent}{:?} {id:?} (children={})", node.node_type(), node.count());
        for (byte, slot) in node.entries() {
            match slot {
                Slot::Leaf(key) => {
                    let _ = writeln!(out, "{indent}  [{byte:02x}] leaf {key:#010x}");
                }
                Slot::Child(child) => {
                    let _ = writeln!(out, "{indent}  [{byte:02x}] ->");
                    self.dump_node(child, depth + 2, out);
                }
                Slot::Empty => {}
            }
        }
    }

    /// Verify tree integrity - returns list of issues found.
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut leaves = 0usize;
        self.verify_node(self.root(), 0, 0, &mut leaves, &mut issues);
        if leaves != self.len() {
            issues.push(format!("{} leaves reachable but len()={}", leaves, self.len()));
        }
        issues
    }

    fn verify_node(&self, id: NodeId, depth: usize, prefix: u32, leaves: &mut usize, issues: &mut Vec<String>) {
        let node = self.arena().get(id);
        let ty = node.node_type();
        let n = node.count();
        let entries = node.entries();

        if depth >= KEY_BYTES {
            issues.push(format!("{ty:?} {id:?} at depth {depth} is below the last key byte"));
            return;
        }
        if n > ty.capacity() {
            issues.push(format!("{ty:?} {id:?} has {n} children (max {})", ty.capacity()));
        }
        if entries.len() != n {
            issues.push(format!("{ty:?} {id:?} has {} occupied slots but count={n}", entries.len()));
        }
        // Nodes only grow, so a tier is never less than one past the previous
        // tier's capacity.
        let min = match ty {
            NodeType::Node4 => usize::from(depth > 0),
            NodeType::Node16 => 5,
            NodeType::Node48 => 17,
            NodeType::Node256 => 49,
        };
        if n < min {
            issues.push(format!("{ty:?} {id:?} has {n} children (min {min})"));
        }

        match node.layout_view() {
            LayoutView::Sorted(keys) => {
                if keys.windows(2).any(|w| w[0] >= w[1]) {
                    issues.push(format!("{ty:?} {id:?} keys not strictly ascending: {keys:?}"));
                }
            }
            LayoutView::Indexed { child_index, slots } => {
                let mut used = [false; 48];
                for (byte, &idx) in child_index.iter().enumerate() {
                    if idx == NODE48_ABSENT {
                        continue;
                    }
                    if idx as usize >= slots.len() {
                        issues.push(format!("Node48 {id:?} byte {byte:#04x} maps to index {idx} >= 48"));
                    } else if std::mem::replace(&mut used[idx as usize], true) {
                        issues.push(format!("Node48 {id:?} index {idx} shared by several bytes"));
                    } else if slots[idx as usize].is_empty() {
                        issues.push(format!("Node48 {id:?} byte {byte:#04x} maps to empty slot {idx}"));
                    }
                }
                for (idx, slot) in slots.iter().enumerate() {
                    if !used[idx] && !slot.is_empty() {
                        issues.push(format!("Node48 {id:?} slot {idx} is occupied but unindexed"));
                    }
                }
            }
            LayoutView::Direct(slots) => {
                let occupied = slots.iter().filter(|s| !s.is_empty()).count();
                if occupied != n {
                    issues.push(format!("Node256 {id:?} has {occupied} occupied slots but count={n}"));
                }
            }
        }

        let shift = 8 * (KEY_BYTES - 1 - depth);
        for (byte, slot) in entries {
            let path = prefix | (u32::from(byte) << shift);
            match slot {
                Slot::Leaf(key) => {
                    *leaves += 1;
                    let matches = (0..=depth).all(|d| partial_key(key, d) == partial_key(path, d));
                    if !matches {
                        issues.push(format!("leaf {key:#010x} stored under path {path:#010x} at depth {depth}"));
                    }
                }
                Slot::Child(child) => self.verify_node(child, depth + 1, path, leaves, issues),
                Slot::Empty => issues.push(format!("{ty:?} {id:?} lists an empty slot under {byte:#04x}")),
            }
        }
    }
}
