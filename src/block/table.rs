//! Position table: fingerprint hash → most recent position with that hash.
//!
//! One generic table replaces the three width-specific backends. The index
//! width is chosen once per call from the input size: 16-bit slots for small
//! inputs (twice as many buckets in the same memory), 32-bit slots otherwise,
//! and pointer-width slots on targets where `usize` is narrower than 64 bits.
//! The width never changes the produced wire format, only which positions the
//! table happens to remember.
//!
//! Entries are hints. A lookup may return a stale or colliding position, so
//! the match finder always confirms four bytes before using one.

use super::types::{hash4, hash5, read_le32, read_le64, LZ4_HASHLOG};

/// A slot type that can store a position.
pub trait TableIndex: Copy + Default {
    /// Number of hash bits, i.e. log₂ of the slot count.
    const HASH_LOG: u32;

    /// Whether fingerprints come from an 8-byte read (5 hashed bytes).
    /// Callers must leave 8 readable bytes at every hashed position.
    const WIDE_HASH: bool;

    fn from_position(pos: usize) -> Self;
    fn position(self) -> usize;
}

impl TableIndex for u16 {
    const HASH_LOG: u32 = LZ4_HASHLOG + 1;
    const WIDE_HASH: bool = false;

    #[inline(always)]
    fn from_position(pos: usize) -> Self {
        debug_assert!(pos <= u16::MAX as usize);
        pos as u16
    }

    #[inline(always)]
    fn position(self) -> usize {
        self as usize
    }
}

impl TableIndex for u32 {
    const HASH_LOG: u32 = LZ4_HASHLOG;
    const WIDE_HASH: bool = cfg!(target_pointer_width = "64");

    #[inline(always)]
    fn from_position(pos: usize) -> Self {
        debug_assert!(pos <= u32::MAX as usize);
        pos as u32
    }

    #[inline(always)]
    fn position(self) -> usize {
        self as usize
    }
}

impl TableIndex for usize {
    const HASH_LOG: u32 = LZ4_HASHLOG;
    const WIDE_HASH: bool = cfg!(target_pointer_width = "64");

    #[inline(always)]
    fn from_position(pos: usize) -> Self {
        pos
    }

    #[inline(always)]
    fn position(self) -> usize {
        self
    }
}

/// Fixed-size, most-recent-wins position index.
#[derive(Clone)]
pub struct PositionTable<I: TableIndex> {
    slots: Box<[I]>,
}

impl<I: TableIndex> PositionTable<I> {
    pub fn new() -> Self {
        PositionTable {
            slots: vec![I::default(); 1 << I::HASH_LOG].into_boxed_slice(),
        }
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Forget every recorded position.
    pub fn clear(&mut self) {
        self.slots.fill(I::default());
    }

    /// Bucket for the sequence starting at `data[pos]`.
    #[inline(always)]
    pub fn hash(data: &[u8], pos: usize) -> usize {
        if I::WIDE_HASH {
            hash5(read_le64(data, pos), I::HASH_LOG)
        } else {
            hash4(read_le32(data, pos), I::HASH_LOG)
        }
    }

    #[inline(always)]
    pub fn get(&self, bucket: usize) -> usize {
        self.slots[bucket].position()
    }

    #[inline(always)]
    pub fn put(&mut self, bucket: usize, position: usize) {
        self.slots[bucket] = I::from_position(position);
    }

    /// Hash `data[pos..]` and record `position` for it.
    #[inline(always)]
    pub fn insert(&mut self, data: &[u8], pos: usize, position: usize) {
        let bucket = Self::hash(data, pos);
        self.put(bucket, position);
    }
}

impl<I: TableIndex> Default for PositionTable<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionTable<u32> {
    /// Subtract `delta` from every position; positions below `delta` become 0.
    pub fn rebase(&mut self, delta: u32) {
        for slot in self.slots.iter_mut() {
            *slot = slot.saturating_sub(delta);
        }
    }
}
