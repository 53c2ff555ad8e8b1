//! Node pool for the tree.
//!
//! All nodes are stored contiguously in one growable vector and addressed by
//! 32-bit [`NodeId`]s instead of pointers. This gives:
//! - No per-node allocation for the smallest (and most common) tier
//! - Better cache locality
//! - No dangling references: a superseded node is returned to the pool in the
//!   same step its replacement is installed
//!
//! Freed entries are reset to an empty node and pushed onto a free list that
//! the next allocation reuses.

use std::mem;

use crate::art::{Node, NodeType};
use crate::slot::{NodeId, Slot};

/// Live node counts per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub node4: usize,
    pub node16: usize,
    pub node48: usize,
    pub node256: usize,
}

impl TierCounts {
    pub fn total(&self) -> usize {
        self.node4 + self.node16 + self.node48 + self.node256
    }

    fn get_mut(&mut self, ty: NodeType) -> &mut usize {
        match ty {
            NodeType::Node4 => &mut self.node4,
            NodeType::Node16 => &mut self.node16,
            NodeType::Node48 => &mut self.node48,
            NodeType::Node256 => &mut self.node256,
        }
    }
}

/// A growable pool of nodes with handle-based access.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    live: TierCounts,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `node` into the pool and return its handle.
    #[inline]
    pub fn alloc(&mut self, node: Node) -> NodeId {
        *self.live.get_mut(node.node_type()) += 1;
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                let id = NodeId::new(self.nodes.len());
                self.nodes.push(node);
                id
            }
        }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Return a single node to the pool. Child nodes it referenced are not
    /// touched; use this when their ownership has already moved elsewhere.
    pub fn free(&mut self, id: NodeId) -> Node {
        let node = mem::take(&mut self.nodes[id.index()]);
        *self.live.get_mut(node.node_type()) -= 1;
        self.free.push(id);
        node
    }

    /// Return a node and every node it owns, recursively, to the pool.
    /// Leaf slots hold no nodes and are not followed.
    pub fn free_subtree(&mut self, id: NodeId) {
        let node = self.free(id);
        node.for_each_in(0, u8::MAX, |_, slot| {
            if let Slot::Child(child) = slot {
                self.free_subtree(child);
            }
        });
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live.total()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn live_counts(&self) -> TierCounts {
        self.live
    }

    /// Approximate heap bytes held by the pool, including boxed layouts.
    pub fn heap_bytes(&self) -> usize {
        // Free entries are empty Node4s and own no heap memory.
        let boxed: usize = self.nodes.iter().map(Node::heap_bytes).sum();
        self.nodes.capacity() * mem::size_of::<Node>()
            + self.free.capacity() * mem::size_of::<NodeId>()
            + boxed
    }
}
