//! Child-table slots.
//!
//! Every node maps a partial key byte to a [`Slot`]. A slot is either empty,
//! a handle to a node one level deeper, or a complete stored key. Storing the
//! full key directly in the parent's table (lazy expansion) means a key that is
//! unique below some prefix never needs a chain of nodes down to full depth.

use std::fmt;

/// A 32-bit reference to a node in the [`NodeArena`](crate::arena::NodeArena).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn new(idx: usize) -> Self {
        debug_assert!(idx < u32::MAX as usize, "node arena exhausted");
        NodeId(idx as u32)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entry of a node's child table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Slot {
    /// No key uses this partial key at this depth.
    #[default]
    Empty,
    /// A node one level deeper, owned by the node holding this slot.
    Child(NodeId),
    /// A complete stored key.
    Leaf(u32),
}

impl Slot {
    #[inline]
    pub fn make_leaf(key: u32) -> Self {
        Slot::Leaf(key)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline]
    pub fn is_leaf(self) -> bool {
        matches!(self, Slot::Leaf(_))
    }

    /// The stored key, if this slot is a leaf.
    #[inline]
    pub fn leaf_value(self) -> Option<u32> {
        match self {
            Slot::Leaf(key) => Some(key),
            _ => None,
        }
    }

    /// The child handle, if this slot points to a node.
    #[inline]
    pub fn child(self) -> Option<NodeId> {
        match self {
            Slot::Child(id) => Some(id),
            _ => None,
        }
    }
}
