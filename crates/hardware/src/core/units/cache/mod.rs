//! Set-Associative Cache Model.
//!
//! This module implements a single cache level: a flat array of
//! `sets × ways` entries, hit detection within the addressed set, and
//! vacant-first/LRU replacement on a miss. It tracks presence and recency only;
//! there is no data storage and no dirty state.
//!
//! The same type backs the I$, the D$, and the L2$. Anything that depends on
//! which level a cache is (where a miss goes next, inclusive invalidation) is
//! handled by the hierarchy that owns the caches.

/// Read-only rendering of cache contents.
pub mod dump;

/// Cache replacement policy implementations.
pub mod policies;

use self::policies::{LruPolicy, ReplacementPolicy};
use crate::common::AddressLayout;
use crate::config::CacheConfig;

/// One storage slot within a set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Way {
    /// Whether the way currently holds a block.
    pub valid: bool,
    /// Address bits above the set-index field of the resident block.
    pub tag: u32,
    /// Recency rank: 0 is most recently used, `ways - 1` least recently used.
    pub lru_rank: usize,
}

/// Result of a single cache access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The block was resident; only recency state changed.
    Hit,
    /// The block was installed.
    Miss {
        /// Block address of the valid line that was displaced, if the fill
        /// did not land in a vacant way.
        evicted: Option<u32>,
    },
}

impl Outcome {
    /// Returns `true` for [`Outcome::Hit`].
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// Cache simulator implementing a set-associative cache with LRU replacement.
///
/// Storage is allocated once in [`CacheSim::new`] and never resized.
#[derive(Debug)]
pub struct CacheSim {
    /// Hit time in cycles.
    pub latency: u64,
    lines: Vec<Way>,
    num_sets: usize,
    ways: usize,
    layout: AddressLayout,
    policy: LruPolicy,
}

impl CacheSim {
    /// Creates a cache with the geometry in `config` and `block_size`-byte blocks.
    ///
    /// Every way starts invalid, ranked by its way index.
    ///
    /// # Arguments
    ///
    /// * `config` - Set count, associativity, and hit time. Expected to be
    ///   enabled with a power-of-two set count (see [`HierarchyConfig::validate`]).
    /// * `block_size` - Block size in bytes, shared by the whole hierarchy.
    ///
    /// [`HierarchyConfig::validate`]: crate::config::HierarchyConfig::validate
    pub fn new(config: &CacheConfig, block_size: usize) -> Self {
        let num_sets = config.sets.max(1);
        let ways = config.ways.max(1);
        let policy = LruPolicy::new();

        let mut lines = vec![Way::default(); num_sets * ways];
        for set in lines.chunks_exact_mut(ways) {
            policy.reset(set);
        }

        Self {
            latency: config.latency,
            lines,
            num_sets,
            ways,
            layout: AddressLayout::new(block_size, num_sets),
            policy,
        }
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Associativity (ways per set).
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Address layout used to index this cache.
    pub const fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    /// Returns the ways of set `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.num_sets()`.
    pub fn set(&self, index: usize) -> &[Way] {
        let base = index * self.ways;
        &self.lines[base..base + self.ways]
    }

    /// Iterates over every set in index order.
    pub fn sets(&self) -> impl ExactSizeIterator<Item = &[Way]> + '_ {
        self.lines.chunks_exact(self.ways)
    }

    fn set_mut(&mut self, index: usize) -> &mut [Way] {
        let base = index * self.ways;
        &mut self.lines[base..base + self.ways]
    }

    fn find(set: &[Way], tag: u32) -> Option<usize> {
        set.iter().position(|w| w.valid && w.tag == tag)
    }

    /// Checks whether the block containing `addr` is resident.
    ///
    /// Does not touch recency state.
    pub fn contains(&self, addr: u32) -> bool {
        self.contains_block(self.layout.block_address(addr))
    }

    /// Checks whether the block with block address `block` is resident.
    pub fn contains_block(&self, block: u32) -> bool {
        let (set, tag) = self.layout.split_block(block);
        Self::find(self.set(set), tag).is_some()
    }

    /// Accesses the cache for `addr`.
    ///
    /// On a hit the matching way is promoted to MRU. On a miss a victim is
    /// chosen (vacant ways first, then the LRU way), filled with the new tag,
    /// and promoted. The evicted block address is computed from the victim's
    /// contents before the fill.
    pub fn access(&mut self, addr: u32) -> Outcome {
        let d = self.layout.decompose(addr);
        let layout = self.layout;
        let policy = self.policy;
        let set = self.set_mut(d.set);

        if let Some(way) = Self::find(set, d.tag) {
            policy.update(set, way);
            return Outcome::Hit;
        }

        let way = policy.get_victim(set);
        let victim = set[way];
        let evicted = victim
            .valid
            .then(|| layout.rebuild_block(victim.tag, d.set));

        set[way].valid = true;
        set[way].tag = d.tag;
        policy.update(set, way);

        Outcome::Miss { evicted }
    }

    /// Invalidates the line holding block address `block`, if present.
    ///
    /// The way's recency rank is left as it is; an invalid way is refilled
    /// before any valid way is evicted, and the fill re-ranks it.
    ///
    /// # Returns
    ///
    /// `true` if a valid line was invalidated.
    pub fn invalidate_block(&mut self, block: u32) -> bool {
        let (set, tag) = self.layout.split_block(block);
        let set = self.set_mut(set);
        match Self::find(set, tag) {
            Some(way) => {
                set[way].valid = false;
                true
            }
            None => false,
        }
    }

    /// Block addresses of every valid line, in set then way order.
    pub fn resident_blocks(&self) -> impl Iterator<Item = u32> + '_ {
        self.sets().enumerate().flat_map(move |(index, set)| {
            set.iter()
                .filter(|w| w.valid)
                .map(move |w| self.layout.rebuild_block(w.tag, index))
        })
    }

    /// Number of valid lines.
    pub fn occupancy(&self) -> usize {
        self.lines.iter().filter(|w| w.valid).count()
    }

    /// Invalidates every line and restores the initial recency order.
    pub fn clear(&mut self) {
        let ways = self.ways;
        let policy = self.policy;
        for set in self.lines.chunks_exact_mut(ways) {
            for way in set.iter_mut() {
                *way = Way::default();
            }
            policy.reset(set);
        }
    }
}
