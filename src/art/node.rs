//! ART node types with adaptive sizing.
//!
//! The key insight of ART is using different node layouts based on
//! the actual number of children:
//!
//! - Node4: Up to 4 children (most common, smallest)
//! - Node16: 5-16 children (sorted keys, SIMD search)
//! - Node48: 17-48 children (256-byte index + 48 slots)
//! - Node256: 49-256 children (direct array indexing)
//!
//! A full node grows into the next tier when one more child is inserted.
//! Every layout presents its children in ascending byte order, which is what
//! makes range queries come out sorted.

use std::mem;

use crate::slot::Slot;

/// Node48 index entry meaning "no child for this byte".
const ABSENT: u8 = u8::MAX;

/// The capacity tier of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    /// Up to 4 children.
    Node4,
    /// 5-16 children.
    Node16,
    /// 17-48 children.
    Node48,
    /// 49-256 children.
    Node256,
}

impl NodeType {
    /// Maximum number of occupied slots for this tier.
    pub const fn capacity(self) -> usize {
        match self {
            NodeType::Node4 => 4,
            NodeType::Node16 => 16,
            NodeType::Node48 => 48,
            NodeType::Node256 => 256,
        }
    }
}

/// Shift the tail of a sorted (key, slot) array one step right and place
/// `byte` at `pos`.
#[inline]
fn shift_insert(keys: &mut [u8], slots: &mut [Slot], len: usize, pos: usize, byte: u8, slot: Slot) {
    keys.copy_within(pos..len, pos + 1);
    slots.copy_within(pos..len, pos + 1);
    keys[pos] = byte;
    slots[pos] = slot;
}

// =============================================================================
// Node4
// =============================================================================

/// Up to 4 (byte, slot) pairs, kept sorted by byte.
#[derive(Clone, Debug)]
pub struct Node4 {
    count: u8,
    keys: [u8; 4],
    slots: [Slot; 4],
}

impl Node4 {
    pub fn new() -> Self {
        Self {
            count: 0,
            keys: [0; 4],
            slots: [Slot::Empty; 4],
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.count as usize
    }

    #[inline]
    fn position(&self, byte: u8) -> Option<usize> {
        self.keys[..self.len()].iter().position(|&k| k == byte)
    }

    #[inline]
    pub fn find_child(&self, byte: u8) -> Slot {
        match self.position(byte) {
            Some(i) => self.slots[i],
            None => Slot::Empty,
        }
    }

    fn insert(&mut self, byte: u8, slot: Slot) {
        let n = self.len();
        debug_assert!(n < 4, "Node4 is full, should grow first");
        let pos = self.keys[..n].iter().take_while(|&&k| k < byte).count();
        shift_insert(&mut self.keys, &mut self.slots, n, pos, byte, slot);
        self.count += 1;
    }

    /// Copy the 4 sorted pairs verbatim; order is preserved.
    fn grow(&self) -> Node16 {
        let mut grown = Node16::new();
        grown.keys[..4].copy_from_slice(&self.keys);
        grown.slots[..4].copy_from_slice(&self.slots);
        grown.count = self.count;
        grown
    }

    fn slot_mut(&mut self, byte: u8) -> Option<&mut Slot> {
        let i = self.position(byte)?;
        Some(&mut self.slots[i])
    }

    fn for_each_in(&self, lo: u8, hi: u8, mut f: impl FnMut(u8, Slot)) {
        for i in 0..self.len() {
            let k = self.keys[i];
            if k > hi {
                break;
            }
            if k >= lo {
                f(k, self.slots[i]);
            }
        }
    }
}

impl Default for Node4 {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Node16
// =============================================================================

/// Up to 16 (byte, slot) pairs, kept sorted by byte and searched with a
/// vector compare where SSE2 is available.
#[derive(Clone, Debug)]
pub struct Node16 {
    count: u8,
    keys: [u8; 16],
    slots: [Slot; 16],
}

impl Node16 {
    pub fn new() -> Self {
        Self {
            count: 0,
            keys: [0; 16],
            slots: [Slot::Empty; 16],
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.count as usize
    }

    /// Bit `i` set for every occupied position.
    #[inline]
    fn valid_mask(&self) -> u32 {
        (1u32 << self.count) - 1
    }

    /// Bit `i` set where `keys[i] == byte`.
    #[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
    #[inline]
    fn eq_mask(&self, byte: u8) -> u32 {
        use std::arch::x86_64::*;

        // SAFETY: SSE2 is enabled for this target and `keys` is exactly 16 bytes.
        let mask = unsafe {
            let keys = _mm_loadu_si128(self.keys.as_ptr() as *const __m128i);
            let cmp = _mm_cmpeq_epi8(keys, _mm_set1_epi8(byte as i8));
            _mm_movemask_epi8(cmp) as u32
        };
        mask & self.valid_mask()
    }

    #[cfg(not(all(target_arch = "x86_64", target_feature = "sse2")))]
    #[inline]
    fn eq_mask(&self, byte: u8) -> u32 {
        let mut mask = 0u32;
        for i in 0..self.len() {
            if self.keys[i] == byte {
                mask |= 1 << i;
            }
        }
        mask
    }

    /// Bit `i` set where `keys[i] < byte` (unsigned).
    #[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
    #[inline]
    fn lt_mask(&self, byte: u8) -> u32 {
        use std::arch::x86_64::*;

        // SAFETY: SSE2 is enabled for this target and `keys` is exactly 16 bytes.
        let mask = unsafe {
            // SSE2 only has a signed byte compare; flipping the sign bit of both
            // sides turns it into an unsigned one.
            let bias = _mm_set1_epi8(i8::MIN);
            let keys = _mm_loadu_si128(self.keys.as_ptr() as *const __m128i);
            let keys = _mm_xor_si128(keys, bias);
            let probe = _mm_xor_si128(_mm_set1_epi8(byte as i8), bias);
            _mm_movemask_epi8(_mm_cmplt_epi8(keys, probe)) as u32
        };
        mask & self.valid_mask()
    }

    #[cfg(not(all(target_arch = "x86_64", target_feature = "sse2")))]
    #[inline]
    fn lt_mask(&self, byte: u8) -> u32 {
        let mut mask = 0u32;
        for i in 0..self.len() {
            if self.keys[i] < byte {
                mask |= 1 << i;
            }
        }
        mask
    }

    #[inline]
    fn position(&self, byte: u8) -> Option<usize> {
        let mask = self.eq_mask(byte);
        if mask != 0 {
            Some(mask.trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// Index of the first key `>= byte`; keys are sorted so this is the
    /// number of keys below it.
    #[inline]
    fn lower_bound(&self, byte: u8) -> usize {
        self.lt_mask(byte).count_ones() as usize
    }

    #[inline]
    pub fn find_child(&self, byte: u8) -> Slot {
        match self.position(byte) {
            Some(i) => self.slots[i],
            None => Slot::Empty,
        }
    }

    fn insert(&mut self, byte: u8, slot: Slot) {
        let n = self.len();
        debug_assert!(n < 16, "Node16 is full, should grow first");
        let pos = self.lower_bound(byte);
        shift_insert(&mut self.keys, &mut self.slots, n, pos, byte, slot);
        self.count += 1;
    }

    /// Build the byte -> index table from the 16 sorted pairs.
    fn grow(&self) -> Node48 {
        let mut grown = Node48::new();
        for i in 0..self.len() {
            grown.child_index[self.keys[i] as usize] = i as u8;
            grown.slots[i] = self.slots[i];
        }
        grown.count = self.count;
        grown
    }

    fn slot_mut(&mut self, byte: u8) -> Option<&mut Slot> {
        let i = self.position(byte)?;
        Some(&mut self.slots[i])
    }

    fn for_each_in(&self, lo: u8, hi: u8, mut f: impl FnMut(u8, Slot)) {
        for i in self.lower_bound(lo)..self.len() {
            let k = self.keys[i];
            if k > hi {
                break;
            }
            f(k, self.slots[i]);
        }
    }
}

impl Default for Node16 {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Node48
// =============================================================================

/// A 256-entry byte -> index table indirecting into 48 slots.
#[derive(Clone, Debug)]
pub struct Node48 {
    count: u8,
    child_index: [u8; 256],
    slots: [Slot; 48],
}

impl Node48 {
    pub fn new() -> Self {
        Self {
            count: 0,
            child_index: [ABSENT; 256],
            slots: [Slot::Empty; 48],
        }
    }

    #[inline]
    pub fn find_child(&self, byte: u8) -> Slot {
        let idx = self.child_index[byte as usize];
        if idx != ABSENT {
            self.slots[idx as usize]
        } else {
            Slot::Empty
        }
    }

    /// First unused slot. Without deletion the occupied slots are always
    /// `0..count`, so the count is checked before scanning.
    fn free_index(&self) -> usize {
        let n = self.count as usize;
        if n < 48 && self.slots[n].is_empty() {
            return n;
        }
        match self.slots.iter().position(|s| s.is_empty()) {
            Some(i) => i,
            None => panic!("Node48 is full, should grow first"),
        }
    }

    fn insert(&mut self, byte: u8, slot: Slot) {
        debug_assert_eq!(self.child_index[byte as usize], ABSENT);
        let idx = self.free_index();
        self.slots[idx] = slot;
        self.child_index[byte as usize] = idx as u8;
        self.count += 1;
    }

    /// Scatter every byte -> index lookup into the direct array.
    fn grow(&self) -> Node256 {
        let mut grown = Node256::new();
        for (byte, &idx) in self.child_index.iter().enumerate() {
            if idx != ABSENT {
                grown.slots[byte] = self.slots[idx as usize];
            }
        }
        grown.count = self.count as u16;
        grown
    }

    fn slot_mut(&mut self, byte: u8) -> Option<&mut Slot> {
        let idx = self.child_index[byte as usize];
        if idx != ABSENT {
            Some(&mut self.slots[idx as usize])
        } else {
            None
        }
    }

    fn for_each_in(&self, lo: u8, hi: u8, mut f: impl FnMut(u8, Slot)) {
        for byte in lo..=hi {
            let idx = self.child_index[byte as usize];
            if idx != ABSENT {
                f(byte, self.slots[idx as usize]);
            }
        }
    }
}

impl Default for Node48 {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Node256
// =============================================================================

/// A direct 256-entry slot array indexed by the byte itself.
#[derive(Clone, Debug)]
pub struct Node256 {
    count: u16,
    slots: [Slot; 256],
}

impl Node256 {
    pub fn new() -> Self {
        Self {
            count: 0,
            slots: [Slot::Empty; 256],
        }
    }

    #[inline]
    pub fn find_child(&self, byte: u8) -> Slot {
        self.slots[byte as usize]
    }

    fn insert(&mut self, byte: u8, slot: Slot) {
        debug_assert!(self.slots[byte as usize].is_empty());
        self.slots[byte as usize] = slot;
        self.count += 1;
    }

    fn slot_mut(&mut self, byte: u8) -> Option<&mut Slot> {
        let slot = &mut self.slots[byte as usize];
        if slot.is_empty() {
            None
        } else {
            Some(slot)
        }
    }

    fn for_each_in(&self, lo: u8, hi: u8, mut f: impl FnMut(u8, Slot)) {
        for byte in lo..=hi {
            let slot = self.slots[byte as usize];
            if !slot.is_empty() {
                f(byte, slot);
            }
        }
    }
}

impl Default for Node256 {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Node
// =============================================================================

/// A node in the tree, dispatched by its tier.
///
/// The larger layouts are boxed so the arena's element size stays that of a
/// Node4.
#[derive(Clone, Debug)]
pub enum Node {
    Node4(Node4),
    Node16(Box<Node16>),
    Node48(Box<Node48>),
    Node256(Box<Node256>),
}

impl Node {
    /// A new empty node of the smallest tier.
    pub fn new() -> Self {
        Node::Node4(Node4::new())
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Node4(_) => NodeType::Node4,
            Node::Node16(_) => NodeType::Node16,
            Node::Node48(_) => NodeType::Node48,
            Node::Node256(_) => NodeType::Node256,
        }
    }

    /// Number of occupied slots.
    pub fn count(&self) -> usize {
        match self {
            Node::Node4(n) => n.count as usize,
            Node::Node16(n) => n.count as usize,
            Node::Node48(n) => n.count as usize,
            Node::Node256(n) => n.count as usize,
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count() >= self.node_type().capacity()
    }

    /// The slot for `byte`, or [`Slot::Empty`] if there is none.
    #[inline]
    pub fn find_child(&self, byte: u8) -> Slot {
        match self {
            Node::Node4(n) => n.find_child(byte),
            Node::Node16(n) => n.find_child(byte),
            Node::Node48(n) => n.find_child(byte),
            Node::Node256(n) => n.find_child(byte),
        }
    }

    /// Place `slot` under `byte`, which must not be present yet.
    ///
    /// If this node is full, the pending insert goes into a freshly grown
    /// node of the next tier that holds every existing slot, and that node is
    /// returned. The caller must then substitute it for this one; `self` is
    /// left unchanged.
    #[must_use = "a grown node must replace the full one"]
    pub fn insert(&mut self, byte: u8, slot: Slot) -> Option<Node> {
        debug_assert!(!slot.is_empty(), "inserting an empty slot");
        debug_assert!(self.find_child(byte).is_empty(), "byte {byte:#04x} already present");

        if !self.is_full() {
            match self {
                Node::Node4(n) => n.insert(byte, slot),
                Node::Node16(n) => n.insert(byte, slot),
                Node::Node48(n) => n.insert(byte, slot),
                Node::Node256(n) => n.insert(byte, slot),
            }
            return None;
        }

        let mut grown = self.grow();
        match grown.insert(byte, slot) {
            None => Some(grown),
            Some(_) => unreachable!("freshly grown node is full"),
        }
    }

    /// A copy of this node's slots in the next tier.
    fn grow(&self) -> Node {
        match self {
            Node::Node4(n) => Node::Node16(Box::new(n.grow())),
            Node::Node16(n) => Node::Node48(Box::new(n.grow())),
            Node::Node48(n) => Node::Node256(Box::new(n.grow())),
            Node::Node256(_) => unreachable!("Node256 never grows"),
        }
    }

    /// Overwrite the slot already stored under `byte`, returning the old one.
    ///
    /// # Panics
    /// Panics if `byte` has no slot in this node.
    pub fn replace(&mut self, byte: u8, slot: Slot) -> Slot {
        debug_assert!(!slot.is_empty(), "replacing with an empty slot");
        let target = match self {
            Node::Node4(n) => n.slot_mut(byte),
            Node::Node16(n) => n.slot_mut(byte),
            Node::Node48(n) => n.slot_mut(byte),
            Node::Node256(n) => n.slot_mut(byte),
        };
        match target {
            Some(s) => mem::replace(s, slot),
            None => panic!("no slot for byte {byte:#04x} to replace"),
        }
    }

    /// Call `f` for every occupied slot whose byte lies in `lo..=hi`, in
    /// ascending byte order.
    #[inline]
    pub fn for_each_in(&self, lo: u8, hi: u8, f: impl FnMut(u8, Slot)) {
        if lo > hi {
            return;
        }
        match self {
            Node::Node4(n) => n.for_each_in(lo, hi, f),
            Node::Node16(n) => n.for_each_in(lo, hi, f),
            Node::Node48(n) => n.for_each_in(lo, hi, f),
            Node::Node256(n) => n.for_each_in(lo, hi, f),
        }
    }

    /// Every occupied (byte, slot) pair in ascending byte order.
    pub fn entries(&self) -> Vec<(u8, Slot)> {
        let mut out = Vec::with_capacity(self.count());
        self.for_each_in(0, u8::MAX, |b, s| out.push((b, s)));
        out
    }

    /// Bytes owned by this node outside the arena's own element storage.
    pub fn heap_bytes(&self) -> usize {
        match self {
            Node::Node4(_) => 0,
            Node::Node16(_) => mem::size_of::<Node16>(),
            Node::Node48(_) => mem::size_of::<Node48>(),
            Node::Node256(_) => mem::size_of::<Node256>(),
        }
    }

    /// Raw layout data for the integrity checker: (sorted keys, or the
    /// Node48 index table).
    pub(crate) fn layout_view(&self) -> LayoutView<'_> {
        match self {
            Node::Node4(n) => LayoutView::Sorted(&n.keys[..n.len()]),
            Node::Node16(n) => LayoutView::Sorted(&n.keys[..n.len()]),
            Node::Node48(n) => LayoutView::Indexed {
                child_index: &n.child_index,
                slots: &n.slots,
            },
            Node::Node256(n) => LayoutView::Direct(&n.slots),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed view of a node's table, used by integrity checks.
pub(crate) enum LayoutView<'a> {
    Sorted(&'a [u8]),
    Indexed {
        child_index: &'a [u8; 256],
        slots: &'a [Slot; 48],
    },
    Direct(&'a [Slot; 256]),
}

pub(crate) const NODE48_ABSENT: u8 = ABSENT;
