//! Address decomposition for set-associative lookup.
//!
//! This module splits 32-bit byte addresses into the three fields a cache
//! consults. It provides the following:
//! 1. **Block Offset:** Low-order bits selecting a byte within a block; ignored by lookup.
//! 2. **Set Index:** Middle bits selecting the set an address maps to.
//! 3. **Tag:** All remaining high-order bits, compared against each way in the set.
//!
//! The inverse mapping (tag + set index back to a block address) is used when an
//! inclusive L2 has to find the L1 copies of a line it is evicting.

/// Rounds `n` up to the next power of two and returns its base-2 logarithm.
///
/// Returns 0 for `n <= 1`.
#[inline]
pub const fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

/// The result of decomposing a byte address against one cache's geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decomposed {
    /// Byte offset within the block.
    pub offset: u32,
    /// Index of the set the block maps to.
    pub set: usize,
    /// Address bits above the set-index field.
    pub tag: u32,
}

/// Bit layout of an address as seen by a single cache.
///
/// Built from the cache's block size and set count. Both are expected to be
/// powers of two; a non-power-of-two set count rounds the index field up and
/// would produce set indices past the end of the set array, so the hierarchy
/// rejects such configurations before a layout is ever built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressLayout {
    offset_bits: u32,
    index_bits: u32,
}

impl AddressLayout {
    /// Creates the layout for a cache with `block_size`-byte blocks and `sets` sets.
    pub const fn new(block_size: usize, sets: usize) -> Self {
        Self {
            offset_bits: ceil_log2(block_size),
            index_bits: ceil_log2(sets),
        }
    }

    /// Number of block-offset bits.
    #[inline]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of set-index bits.
    #[inline]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Discards the block-offset bits of `addr`.
    #[inline]
    pub const fn block_address(&self, addr: u32) -> u32 {
        match addr.checked_shr(self.offset_bits) {
            Some(block) => block,
            None => 0,
        }
    }

    /// Splits an already block-granular address into `(set index, tag)`.
    #[inline]
    pub const fn split_block(&self, block: u32) -> (usize, u32) {
        if self.index_bits == 0 {
            return (0, block);
        }
        let mask = match 1u32.checked_shl(self.index_bits) {
            Some(span) => span - 1,
            None => u32::MAX,
        };
        let tag = match block.checked_shr(self.index_bits) {
            Some(tag) => tag,
            None => 0,
        };
        ((block & mask) as usize, tag)
    }

    /// Decomposes a byte address into offset, set index, and tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachesim_core::common::addr::AddressLayout;
    ///
    /// // 16-byte blocks, 4 sets: 4 offset bits, 2 index bits.
    /// let layout = AddressLayout::new(16, 4);
    /// let d = layout.decompose(0x1234);
    /// assert_eq!(d.offset, 0x4);
    /// assert_eq!(d.set, 0x3);
    /// assert_eq!(d.tag, 0x48);
    /// ```
    pub const fn decompose(&self, addr: u32) -> Decomposed {
        let offset = if self.offset_bits >= u32::BITS {
            addr
        } else {
            addr & ((1u32 << self.offset_bits) - 1)
        };
        let (set, tag) = self.split_block(self.block_address(addr));
        Decomposed { offset, set, tag }
    }

    /// Rebuilds the block address a `(tag, set)` pair was carved from.
    ///
    /// This is the exact inverse of [`split_block`](Self::split_block) for any
    /// set index inside the cache.
    #[inline]
    pub const fn rebuild_block(&self, tag: u32, set: usize) -> u32 {
        let high = match tag.checked_shl(self.index_bits) {
            Some(high) => high,
            None => 0,
        };
        high | set as u32
    }
}
