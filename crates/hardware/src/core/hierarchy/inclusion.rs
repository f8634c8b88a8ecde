//! Inclusive L2 back-invalidation.
//!
//! When an inclusive L2$ evicts a valid line, any copy of that block in the
//! I$ or D$ is invalidated so that no L1 line outlives its L2 backing.

use tracing::debug;

use super::{Caches, Hierarchy};
use crate::common::Level;
use crate::stats::HierarchyStats;

impl Caches {
    /// Invalidates the L1 copies of the block with block address `block`.
    ///
    /// `block` is the evicted L2 line's `(tag << index_bits) | set`; each L1
    /// re-splits it against its own set count. Disabled L1 levels are skipped.
    pub(super) fn back_invalidate(&mut self, block: u32, stats: &mut HierarchyStats) {
        for level in [Level::Instruction, Level::Data] {
            let Some(cache) = self.cache_mut(level) else {
                continue;
            };
            if cache.invalidate_block(block) {
                stats.level_mut(level).invalidations += 1;
                debug!(%level, block, "back-invalidated line evicted from inclusive L2");
            }
        }
    }
}

impl Hierarchy {
    /// Checks that every valid L1 line is also resident in the L2$.
    ///
    /// Trivially `true` when the L2$ is disabled or the hierarchy is
    /// uninitialized. Holds after every access when the L2 is inclusive.
    pub fn inclusion_holds(&self) -> bool {
        let Some(l2) = self.l2cache() else {
            return true;
        };
        [self.icache(), self.dcache()]
            .into_iter()
            .flatten()
            .all(|l1| l1.resident_blocks().all(|block| l2.contains_block(block)))
    }
}
