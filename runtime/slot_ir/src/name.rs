//! Slot and fallback names.
//!
//! Every key in an instance store and every key in a class fallback table
//! is a [`Name`]. Lookups compare names, never strings; the string form
//! lives only in the [`StringInterner`](crate::StringInterner).

use std::fmt;

/// Interned slot or fallback name.
///
/// A name records where the interner keeps its text: the top four bits pick
/// the shard, the low 28 bits index into that shard. Two names are equal
/// exactly when they were interned from the same string by the same
/// interner.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The empty string, interned up front at shard 0, slot 0.
    pub const EMPTY: Name = Name(0);

    /// Bit offset of the shard in the packed value.
    const SHARD_SHIFT: u32 = 28;

    /// Largest index a single shard can hand out.
    pub const MAX_LOCAL: u32 = (1 << Self::SHARD_SHIFT) - 1;

    /// Shards in an interner; one per value of the four shard bits.
    pub const NUM_SHARDS: usize = 1 << (u32::BITS - Self::SHARD_SHIFT);

    /// Pack a shard and an index within it.
    #[inline]
    pub const fn new(shard: u32, local: u32) -> Self {
        debug_assert!((shard as usize) < Self::NUM_SHARDS);
        debug_assert!(local <= Self::MAX_LOCAL);
        Name((shard << Self::SHARD_SHIFT) | local)
    }

    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> Self::SHARD_SHIFT) as usize
    }

    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    /// The packed value, for logging and stable ordering.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(shard={}, local={})", self.shard(), self.local())
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
