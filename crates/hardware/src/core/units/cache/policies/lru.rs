//! Least Recently Used (LRU) Replacement Policy.
//!
//! Each way carries an integer rank: 0 is the most recently used way and
//! `ways - 1` the least recently used. Within a set the ranks always form the
//! permutation `{0, .., ways - 1}`.
//!
//! On an access the touched way moves to rank 0 and every way that was more
//! recent than it slides down by one. Ways that were already older keep their
//! rank, so the permutation is preserved without sorting.
//!
//! Victim selection prefers a vacant (invalid) way, lowest index first, and
//! only evicts the rank `ways - 1` line when the set is full.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(W) where W is the number of ways (associativity)
//!   - `get_victim()`: O(W)
//! - **Space Complexity:** one rank per way, stored in the way itself

use super::{ReplacementPolicy, Way};

/// Rank-based LRU policy with vacant-first fill.
#[derive(Clone, Copy, Debug, Default)]
pub struct LruPolicy;

impl LruPolicy {
    /// Creates a new LRU policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Ranks every way by its index: way 0 is MRU, the last way is LRU.
    fn reset(&self, set: &mut [Way]) {
        for (rank, way) in set.iter_mut().enumerate() {
            way.lru_rank = rank;
        }
    }

    /// Promotes `way` to rank 0 and ages every way that was more recent.
    fn update(&self, set: &mut [Way], way: usize) {
        let old_rank = set[way].lru_rank;
        debug_assert!(old_rank < set.len(), "LRU rank {old_rank} out of range");

        for (i, other) in set.iter_mut().enumerate() {
            if i == way {
                other.lru_rank = 0;
            } else if other.lru_rank < old_rank {
                other.lru_rank += 1;
            }
        }
        debug_assert!(is_permutation(set), "LRU ranks no longer a permutation");
    }

    /// Returns the first invalid way, or the way holding the LRU rank.
    fn get_victim(&self, set: &[Way]) -> usize {
        if let Some(vacant) = set.iter().position(|w| !w.valid) {
            return vacant;
        }
        let lru = set.len().saturating_sub(1);
        let victim = set.iter().position(|w| w.lru_rank == lru);
        debug_assert!(victim.is_some(), "no way holds LRU rank {lru}");
        victim.unwrap_or(0)
    }
}

/// Returns `true` if the ranks of `set` are exactly `{0, .., set.len() - 1}`.
pub fn is_permutation(set: &[Way]) -> bool {
    let mut seen = vec![false; set.len()];
    for way in set {
        match seen.get_mut(way.lru_rank) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}
