//! Range queries.
//!
//! A range `[from, to]` is decomposed level by level. While the two bounds
//! share a partial key only one child can hold matches. Once they diverge,
//! the child under `from`'s byte only needs its lower bound checked, the one
//! under `to`'s byte only its upper bound, and every child strictly between
//! them is taken whole. Children are visited in ascending byte order, so the
//! output is sorted without any extra work.

use super::{partial_key, Art, KEY_BYTES};
use crate::slot::{NodeId, Slot};

impl Art {
    /// All stored keys `k` with `from <= k <= to`, in ascending order.
    ///
    /// An inverted range (`from > to`) is empty.
    pub fn find_range(&self, from: u32, to: u32) -> Vec<u32> {
        let mut out = Vec::new();
        if from <= to {
            self.range(self.root(), from, to, 0, &mut out);
        }
        out
    }

    fn range(&self, id: NodeId, from: u32, to: u32, depth: usize, out: &mut Vec<u32>) {
        let node = self.arena().get(id);
        let fb = partial_key(from, depth);
        let tb = partial_key(to, depth);

        if fb == tb {
            match node.find_child(fb) {
                Slot::Empty => {}
                Slot::Leaf(key) => {
                    if from <= key && key <= to {
                        out.push(key);
                    }
                }
                Slot::Child(child) => {
                    if depth + 1 < KEY_BYTES {
                        self.range(child, from, to, depth + 1, out);
                    } else {
                        // Both bounds agree on every byte, so the child spells `from`.
                        out.push(from);
                    }
                }
            }
            return;
        }

        node.for_each_in(fb, tb, |byte, slot| {
            if byte == fb {
                self.lower_slot(slot, from, depth + 1, out);
            } else if byte == tb {
                self.upper_slot(slot, to, depth + 1, out);
            } else {
                self.full_slot(slot, out);
            }
        });
    }

    /// Keys `>= from` below a node whose path matches `from` so far.
    fn lower_range(&self, id: NodeId, from: u32, depth: usize, out: &mut Vec<u32>) {
        let fb = partial_key(from, depth);
        self.arena().get(id).for_each_in(fb, u8::MAX, |byte, slot| {
            if byte == fb {
                self.lower_slot(slot, from, depth + 1, out);
            } else {
                self.full_slot(slot, out);
            }
        });
    }

    /// Keys `<= to` below a node whose path matches `to` so far.
    fn upper_range(&self, id: NodeId, to: u32, depth: usize, out: &mut Vec<u32>) {
        let tb = partial_key(to, depth);
        self.arena().get(id).for_each_in(0, tb, |byte, slot| {
            if byte == tb {
                self.upper_slot(slot, to, depth + 1, out);
            } else {
                self.full_slot(slot, out);
            }
        });
    }

    /// Every key below `id`.
    fn full_range(&self, id: NodeId, out: &mut Vec<u32>) {
        self.arena()
            .get(id)
            .for_each_in(0, u8::MAX, |_, slot| self.full_slot(slot, out));
    }

    /// `depth` is the level of the node `slot` points to, if any.
    #[inline]
    fn lower_slot(&self, slot: Slot, from: u32, depth: usize, out: &mut Vec<u32>) {
        match slot {
            Slot::Empty => {}
            Slot::Leaf(key) => {
                if key >= from {
                    out.push(key);
                }
            }
            Slot::Child(child) if depth < KEY_BYTES => self.lower_range(child, from, depth, out),
            Slot::Child(_) => out.push(from),
        }
    }

    #[inline]
    fn upper_slot(&self, slot: Slot, to: u32, depth: usize, out: &mut Vec<u32>) {
        match slot {
            Slot::Empty => {}
            Slot::Leaf(key) => {
                if key <= to {
                    out.push(key);
                }
            }
            Slot::Child(child) if depth < KEY_BYTES => self.upper_range(child, to, depth, out),
            Slot::Child(_) => out.push(to),
        }
    }

    #[inline]
    fn full_slot(&self, slot: Slot, out: &mut Vec<u32>) {
        match slot {
            Slot::Empty => {}
            Slot::Leaf(key) => out.push(key),
            Slot::Child(child) => self.full_range(child, out),
        }
    }
}
