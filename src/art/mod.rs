//! Adaptive Radix Tree (ART) over 32-bit keys.
//!
//! Based on "The Adaptive Radix Tree: ARTful Indexing for Main-Memory Databases"
//! by Leis et al., 2013.
//!
//! Key features:
//! - Adaptive node sizes (4, 16, 48, 256 children)
//! - Fixed height: a key is split into 4 bytes, most significant first, one
//!   per level
//! - Lazy expansion: a key that is unique below its prefix is stored as a
//!   leaf slot in the deepest existing node instead of under a chain of
//!   single-child nodes
//!
//! There is no path compression and no leaf node type; 4 consumed bytes always
//! identify a 32-bit key.

mod debug;
mod node;
mod range;

pub use debug::ArtStats;
pub use node::{Node, Node16, Node256, Node4, Node48, NodeType};

use crate::arena::NodeArena;
use crate::slot::{NodeId, Slot};

/// Number of bytes (and therefore levels) in a key.
pub const KEY_BYTES: usize = 4;

/// The byte of `key` consumed at `depth`, most significant first.
#[inline]
pub(crate) fn partial_key(key: u32, depth: usize) -> u8 {
    debug_assert!(depth < KEY_BYTES);
    (key >> (8 * (KEY_BYTES - 1 - depth))) as u8
}

/// A set of `u32` keys stored in an Adaptive Radix Tree.
///
/// ```rust
/// use art32::Art;
///
/// let mut art = Art::new();
/// for key in [0, 1, 128, 240, u32::MAX] {
///     art.insert(key);
/// }
/// assert!(art.find(128));
/// assert!(!art.find(17));
/// assert_eq!(art.find_range(0, 240), vec![0, 1, 128, 240]);
/// ```
#[derive(Clone)]
pub struct Art {
    arena: NodeArena,
    /// Always a node, never a bare leaf.
    root: NodeId,
    len: usize,
}

impl Art {
    /// Create an empty tree with a single Node4 root.
    pub fn new() -> Self {
        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::new());
        Self { arena, root, len: 0 }
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `key`. Inserting a key that is already present does nothing.
    pub fn insert(&mut self, key: u32) {
        // Where the current node hangs: its parent and the byte it sits under.
        let mut parent: Option<(NodeId, u8)> = None;
        let mut id = self.root;

        for depth in 0..KEY_BYTES {
            let byte = partial_key(key, depth);

            match self.arena.get(id).find_child(byte) {
                Slot::Empty => {
                    if let Some(grown) = self.arena.get_mut(id).insert(byte, Slot::make_leaf(key)) {
                        self.splice_grown(parent, id, grown);
                    }
                    self.len += 1;
                    return;
                }
                Slot::Leaf(existing) => {
                    if existing == key {
                        return;
                    }
                    // Both keys share bytes 0..=depth; materialize nodes down to
                    // the first byte where they differ.
                    let chain = self.expand(key, existing, depth + 1);
                    self.arena.get_mut(id).replace(byte, Slot::Child(chain));
                    self.len += 1;
                    return;
                }
                Slot::Child(child) => {
                    parent = Some((id, byte));
                    id = child;
                }
            }
        }

        // Every level was a child node, so all 4 bytes are already on a path.
    }

    /// Install `grown` in place of the full node `old` and return `old` to the
    /// pool.
    fn splice_grown(&mut self, parent: Option<(NodeId, u8)>, old: NodeId, grown: Node) {
        trace_log!(node = ?old, from = ?self.arena.get(old).node_type(), to = ?grown.node_type(), "node grew");

        let new_id = self.arena.alloc(grown);
        match parent {
            None => self.root = new_id,
            Some((p, byte)) => {
                self.arena.get_mut(p).replace(byte, Slot::Child(new_id));
            }
        }
        self.arena.free(old);
    }

    /// Build the chain of Node4s that separates two distinct keys agreeing on
    /// every byte before `depth`, and return its top node.
    fn expand(&mut self, key: u32, existing: u32, depth: usize) -> NodeId {
        debug_assert_ne!(key, existing);
        debug_log!(key, existing, depth, "lazy expansion");

        let top = self.arena.alloc(Node::new());
        let mut cur = top;

        for d in depth..KEY_BYTES {
            let a = partial_key(key, d);
            let b = partial_key(existing, d);
            let node = self.arena.get_mut(cur);

            if a != b {
                let grew = node.insert(a, Slot::make_leaf(key)).is_some()
                    || node.insert(b, Slot::make_leaf(existing)).is_some();
                debug_assert!(!grew, "fresh Node4 cannot overflow with two children");
                return top;
            }

            let next = self.arena.alloc(Node::new());
            let grew = self.arena.get_mut(cur).insert(a, Slot::Child(next)).is_some();
            debug_assert!(!grew, "fresh Node4 cannot overflow with one child");
            cur = next;
        }

        unreachable!("distinct keys {key:#010x} and {existing:#010x} share all bytes")
    }

    /// Check whether `key` is stored.
    pub fn find(&self, key: u32) -> bool {
        let mut id = self.root;

        for depth in 0..KEY_BYTES {
            match self.arena.get(id).find_child(partial_key(key, depth)) {
                Slot::Empty => return false,
                Slot::Leaf(stored) => return stored == key,
                Slot::Child(child) => id = child,
            }
        }

        // All 4 bytes matched along child nodes.
        true
    }

    /// Remove every key, keeping a single empty root.
    pub fn clear(&mut self) {
        self.arena.free_subtree(self.root);
        self.root = self.arena.alloc(Node::new());
        self.len = 0;
    }

    /// Every stored key in ascending order.
    pub fn keys(&self) -> Vec<u32> {
        self.find_range(0, u32::MAX)
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn arena(&self) -> &NodeArena {
        &self.arena
    }
}

impl Default for Art {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<u32> for Art {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl FromIterator<u32> for Art {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut art = Art::new();
        art.extend(iter);
        art
    }
}

impl std::fmt::Debug for Art {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Art")
            .field("len", &self.len)
            .field("nodes", &self.arena.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_key_msb_first() {
        let key = 0x1122_3344;
        assert_eq!(partial_key(key, 0), 0x11);
        assert_eq!(partial_key(key, 1), 0x22);
        assert_eq!(partial_key(key, 2), 0x33);
        assert_eq!(partial_key(key, 3), 0x44);
    }

    #[test]
    fn test_empty() {
        let art = Art::new();
        assert!(art.is_empty());
        assert!(!art.find(0));
        assert!(!art.find(u32::MAX));
        assert_eq!(art.find_range(0, u32::MAX), Vec::<u32>::new());
        assert_eq!(art.arena().len(), 1);
    }

    #[test]
    fn test_concrete_scenario() {
        let mut art = Art::new();
        for key in [0, 1, 128, 240, 4294967295] {
            art.insert(key);
        }
        for key in [0, 1, 128, 240, 4294967295] {
            assert!(art.find(key), "missing {key}");
        }
        assert!(!art.find(2));
        assert!(!art.find(17));
        assert_eq!(art.find_range(0, 240), vec![0, 1, 128, 240]);
        assert_eq!(art.len(), 5);
    }

    #[test]
    fn test_divergence_on_last_byte() {
        let mut art = Art::new();
        art.insert(0x0000_0001);
        // A single key lives as a leaf in the root.
        assert_eq!(art.arena().len(), 1);

        art.insert(0x0000_0002);
        assert!(art.find(1));
        assert!(art.find(2));
        assert!(!art.find(3));
        assert_eq!(art.find_range(1, 2), vec![1, 2]);
        // Root plus a chain for bytes 1 and 2 plus the node holding both leaves.
        assert_eq!(art.arena().len(), 4);
    }

    #[test]
    fn test_divergence_on_first_shared_byte() {
        let mut art = Art::new();
        art.insert(0xAB00_0000);
        art.insert(0xAB01_0000);
        assert!(art.find(0xAB00_0000));
        assert!(art.find(0xAB01_0000));
        assert!(!art.find(0xAB02_0000));
        assert_eq!(art.arena().len(), 2);
    }

    #[test]
    fn test_insert_idempotent() {
        let mut art = Art::new();
        for _ in 0..3 {
            art.insert(42);
            art.insert(43);
        }
        assert_eq!(art.len(), 2);
        let nodes = art.arena().len();
        art.insert(42);
        assert_eq!(art.arena().len(), nodes);
        assert_eq!(art.keys(), vec![42, 43]);
    }

    #[test]
    fn test_root_growth_boundaries() {
        let mut art = Art::new();
        let key_for = |lead: u32| (lead << 24) | 0x00AB_CDEF;

        for (n, tier) in [(5, NodeType::Node16), (17, NodeType::Node48), (49, NodeType::Node256)] {
            for lead in 0..n {
                art.insert(key_for(lead));
            }
            assert_eq!(art.arena().get(art.root()).node_type(), tier);
            for lead in 0..n {
                assert!(art.find(key_for(lead)), "lost key with lead byte {lead} after growing to {tier:?}");
            }
            assert!(!art.find(key_for(n)));
        }
        // Superseded roots went back to the pool.
        assert_eq!(art.arena().len(), 1);
        assert!(art.verify_integrity().is_empty());
    }

    #[test]
    fn test_inner_growth_splices_into_parent() {
        let mut art = Art::new();
        // All keys share the first byte, so growth happens one level down.
        for low in 0..=255u32 {
            art.insert(0x7700_0000 | (low << 16));
        }
        assert_eq!(art.len(), 256);
        for low in 0..=255u32 {
            assert!(art.find(0x7700_0000 | (low << 16)));
        }
        let stats = art.stats();
        assert_eq!(stats.nodes.node256, 1);
        assert_eq!(stats.nodes.node4, 1);
        assert_eq!(stats.nodes.total(), 2);
        assert!(art.verify_integrity().is_empty());
    }

    #[test]
    fn test_dense_keys() {
        let art: Art = (0..70_000u32).collect();
        assert_eq!(art.len(), 70_000);
        for key in 0..70_000u32 {
            assert!(art.find(key), "missing {key}");
        }
        assert!(!art.find(70_000));
        assert_eq!(art.keys(), (0..70_000u32).collect::<Vec<_>>());
        assert!(art.verify_integrity().is_empty());
    }

    #[test]
    fn test_random_against_btreeset() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};
        use std::collections::BTreeSet;

        let mut rng = StdRng::seed_from_u64(7);
        let mut art = Art::new();
        let mut set = BTreeSet::new();

        for _ in 0..20_000 {
            // Mix clustered and uniform keys so every tier shows up.
            let key: u32 = if rng.gen_bool(0.5) {
                rng.gen_range(0..4096) << 12
            } else {
                rng.gen()
            };
            art.insert(key);
            set.insert(key);
        }

        assert_eq!(art.len(), set.len());
        for _ in 0..20_000 {
            let probe: u32 = rng.gen();
            assert_eq!(art.find(probe), set.contains(&probe));
        }
        for &key in &set {
            assert!(art.find(key));
        }
        assert_eq!(art.keys(), set.iter().copied().collect::<Vec<_>>());
        assert!(art.verify_integrity().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut art: Art = (0..1000u32).map(|i| i.wrapping_mul(2_654_435_761)).collect();
        assert_eq!(art.len(), 1000);
        art.clear();
        assert!(art.is_empty());
        assert_eq!(art.arena().len(), 1);
        assert!(!art.find(0));
        art.insert(5);
        assert_eq!(art.keys(), vec![5]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a: Art = [1u32, 2, 3].into_iter().collect();
        let b = a.clone();
        a.insert(4);
        assert!(a.find(4));
        assert!(!b.find(4));
        assert_eq!(b.keys(), vec![1, 2, 3]);
    }
}
