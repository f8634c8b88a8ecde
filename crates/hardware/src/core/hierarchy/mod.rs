//! Two-level cache hierarchy.
//!
//! This module wires three [`CacheSim`] instances into the hierarchy seen by a
//! trace replay loop. It performs:
//! 1. **Initialization:** Validates the configuration and allocates every enabled level.
//! 2. **Dispatch:** Sends instruction fetches to the I$ and data accesses to the D$.
//! 3. **Miss Handling:** Forwards L1 misses to the L2$ and L2 misses to main memory.
//! 4. **Inclusion:** Back-invalidates L1 copies of lines evicted from an inclusive L2$.
//! 5. **Accounting:** Maintains per-level reference, miss, and penalty counters.
//!
//! A disabled level owns no storage and adds no latency; its traffic falls
//! straight through to the next level.

/// Inclusive L2 back-invalidation.
mod inclusion;

use std::fmt;

use tracing::{debug, trace, warn};

use crate::common::{AccessError, AccessType, ConfigError, Level};
use crate::config::HierarchyConfig;
use crate::core::units::cache::{CacheSim, Outcome};
use crate::stats::HierarchyStats;

/// Storage of an initialized hierarchy.
#[derive(Debug)]
struct Caches {
    config: HierarchyConfig,
    l1_i: Option<CacheSim>,
    l1_d: Option<CacheSim>,
    l2: Option<CacheSim>,
}

impl Caches {
    fn new(config: &HierarchyConfig) -> Self {
        let build = |level: Level| {
            let cfg = config.level(level);
            if cfg.enabled() {
                debug!(
                    %level,
                    sets = cfg.sets,
                    ways = cfg.ways,
                    hit_time = cfg.latency,
                    "allocating cache"
                );
                Some(CacheSim::new(cfg, config.block_size))
            } else {
                debug!(%level, "cache disabled, bypassing");
                None
            }
        };

        Self {
            config: *config,
            l1_i: build(Level::Instruction),
            l1_d: build(Level::Data),
            l2: build(Level::L2),
        }
    }

    fn cache(&self, level: Level) -> Option<&CacheSim> {
        match level {
            Level::Instruction => self.l1_i.as_ref(),
            Level::Data => self.l1_d.as_ref(),
            Level::L2 => self.l2.as_ref(),
        }
    }

    fn cache_mut(&mut self, level: Level) -> Option<&mut CacheSim> {
        match level {
            Level::Instruction => self.l1_i.as_mut(),
            Level::Data => self.l1_d.as_mut(),
            Level::L2 => self.l2.as_mut(),
        }
    }

    /// Accesses one of the L1 caches, falling through to the L2 on a miss.
    fn l1_access(&mut self, level: Level, addr: u32, stats: &mut HierarchyStats) -> u64 {
        debug_assert!(level.is_l1());
        let (outcome, hit_time) = match self.cache_mut(level) {
            Some(cache) => (cache.access(addr), cache.latency),
            None => return self.l2_access(addr, stats),
        };
        stats.level_mut(level).references += 1;

        match outcome {
            Outcome::Hit => {
                trace!(%level, addr, "hit");
                hit_time
            }
            Outcome::Miss { .. } => {
                trace!(%level, addr, "miss");
                let below = self.l2_access(addr, stats);
                let s = stats.level_mut(level);
                s.misses += 1;
                s.penalties = s.penalties.saturating_add(below);
                hit_time.saturating_add(below)
            }
        }
    }

    /// Accesses the L2, falling through to main memory on a miss.
    fn l2_access(&mut self, addr: u32, stats: &mut HierarchyStats) -> u64 {
        let mem_speed = self.config.mem_speed;
        let (outcome, hit_time) = match self.l2.as_mut() {
            Some(l2) => (l2.access(addr), l2.latency),
            None => return mem_speed,
        };
        stats.l2cache.references += 1;

        match outcome {
            Outcome::Hit => {
                trace!(level = %Level::L2, addr, "hit");
                hit_time
            }
            Outcome::Miss { evicted } => {
                trace!(level = %Level::L2, addr, evicted = ?evicted, "miss");
                stats.l2cache.misses += 1;
                stats.l2cache.penalties = stats.l2cache.penalties.saturating_add(mem_speed);
                if self.config.inclusive
                    && let Some(block) = evicted
                {
                    self.back_invalidate(block, stats);
                }
                hit_time.saturating_add(mem_speed)
            }
        }
    }
}

/// The I$ / D$ / L2$ hierarchy together with its statistics.
///
/// A `Hierarchy` is either initialized, holding a validated configuration and
/// the storage of every enabled level, or uninitialized, in which case every
/// access returns [`AccessError::Uninitialized`].
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{CacheConfig, HierarchyConfig};
/// use cachesim_core::Hierarchy;
///
/// let config = HierarchyConfig {
///     l1_i: CacheConfig::new(4, 1, 1),
///     l2: CacheConfig::new(2, 2, 10),
///     block_size: 16,
///     mem_speed: 100,
///     inclusive: true,
///     ..HierarchyConfig::default()
/// };
/// let mut hierarchy = Hierarchy::new(&config).unwrap();
///
/// assert_eq!(hierarchy.instruction_access(0x00), Ok(111));
/// assert_eq!(hierarchy.instruction_access(0x00), Ok(1));
/// assert_eq!(hierarchy.stats().icache.misses, 1);
/// ```
#[derive(Debug, Default)]
pub struct Hierarchy {
    caches: Option<Caches>,
    stats: HierarchyStats,
}

impl Hierarchy {
    /// Builds an initialized hierarchy from `config`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`HierarchyConfig::validate`].
    pub fn new(config: &HierarchyConfig) -> Result<Self, ConfigError> {
        let mut hierarchy = Self::default();
        hierarchy.initialize(config)?;
        Ok(hierarchy)
    }

    /// (Re-)initializes the hierarchy.
    ///
    /// Releases any existing storage and zeroes every counter, then allocates
    /// every enabled level with all ways invalid and ranked by way index.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`HierarchyConfig::validate`].
    /// The hierarchy is left uninitialized in that case.
    pub fn initialize(&mut self, config: &HierarchyConfig) -> Result<(), ConfigError> {
        self.release();
        if let Err(e) = config.validate() {
            warn!(error = %e, "rejecting cache hierarchy configuration");
            return Err(e);
        }
        debug!(
            block_size = config.block_size,
            mem_speed = config.mem_speed,
            inclusive = config.inclusive,
            "initializing cache hierarchy"
        );
        self.caches = Some(Caches::new(config));
        Ok(())
    }

    /// Releases all cache storage and zeroes the counters.
    pub fn release(&mut self) {
        self.caches = None;
        self.stats = HierarchyStats::default();
    }

    /// Returns `true` once [`initialize`](Self::initialize) has succeeded.
    pub const fn is_initialized(&self) -> bool {
        self.caches.is_some()
    }

    /// Performs an instruction fetch of `addr` through the I$.
    ///
    /// # Returns
    ///
    /// The access time in cycles: the hit time of every level consulted on
    /// the way down, plus the memory latency if the access reached memory.
    /// Sums saturate at `u64::MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Uninitialized`] if there is no valid hierarchy.
    pub fn instruction_access(&mut self, addr: u32) -> Result<u64, AccessError> {
        self.access(AccessType::Fetch, addr)
    }

    /// Performs a data access of `addr` through the D$.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Uninitialized`] if there is no valid hierarchy.
    pub fn data_access(&mut self, addr: u32) -> Result<u64, AccessError> {
        self.access(AccessType::Data, addr)
    }

    /// Performs an access of the given type.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Uninitialized`] if there is no valid hierarchy.
    pub fn access(&mut self, access: AccessType, addr: u32) -> Result<u64, AccessError> {
        let caches = self.caches.as_mut().ok_or(AccessError::Uninitialized)?;
        Ok(caches.l1_access(access.entry_level(), addr, &mut self.stats))
    }

    /// Accesses the L2$ directly, as an L1 miss would.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Uninitialized`] if there is no valid hierarchy.
    pub fn l2_access(&mut self, addr: u32) -> Result<u64, AccessError> {
        let caches = self.caches.as_mut().ok_or(AccessError::Uninitialized)?;
        Ok(caches.l2_access(addr, &mut self.stats))
    }

    /// Per-level counters accumulated since the last initialization.
    pub const fn stats(&self) -> &HierarchyStats {
        &self.stats
    }

    /// The active configuration, if initialized.
    pub fn config(&self) -> Option<&HierarchyConfig> {
        self.caches.as_ref().map(|c| &c.config)
    }

    /// The cache backing `level`, or `None` if the level is disabled or the
    /// hierarchy is uninitialized.
    pub fn cache(&self, level: Level) -> Option<&CacheSim> {
        self.caches.as_ref().and_then(|c| c.cache(level))
    }

    /// The I$, if enabled.
    pub fn icache(&self) -> Option<&CacheSim> {
        self.cache(Level::Instruction)
    }

    /// The D$, if enabled.
    pub fn dcache(&self) -> Option<&CacheSim> {
        self.cache(Level::Data)
    }

    /// The L2$, if enabled.
    pub fn l2cache(&self) -> Option<&CacheSim> {
        self.cache(Level::L2)
    }
}

impl fmt::Display for Hierarchy {
    /// Dumps the contents of every enabled level.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in Level::ALL {
            if let Some(cache) = self.cache(level) {
                writeln!(f, "------------------ {level} ------------------")?;
                write!(f, "{cache}")?;
            }
        }
        Ok(())
    }
}
