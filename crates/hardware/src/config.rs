//! Configuration for the cache hierarchy.
//!
//! This module defines the structures used to parameterize the simulator. It provides:
//! 1. **Defaults:** Baseline geometry and timing constants.
//! 2. **Structures:** Per-level `CacheConfig` and the shared `HierarchyConfig`.
//! 3. **Validation:** Power-of-two checks performed before any storage is allocated.
//!
//! Configuration is supplied as JSON, as `sets:assoc:hit_time` strings from the
//! command line, or built in code starting from `HierarchyConfig::default()`.

use std::str::FromStr;

use serde::Deserialize;

use crate::common::addr::ceil_log2;
use crate::common::{ConfigError, Level};

/// Default configuration constants for the simulator.
///
/// Every cache level starts out disabled; a default hierarchy sends each
/// access straight to main memory.
mod defaults {
    /// Default number of sets (0 = level disabled).
    pub const SETS: usize = 0;

    /// Default associativity (0 = level disabled).
    pub const WAYS: usize = 0;

    /// Default cache hit time in cycles.
    pub const HIT_TIME: u64 = 1;

    /// Default block (line) size in bytes.
    pub const BLOCK_SIZE: usize = 32;

    /// Default main memory latency in cycles.
    pub const MEM_SPEED: u64 = 100;
}

/// Geometry and timing of a single cache level.
///
/// A level with zero sets or zero ways is disabled and bypassed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Number of sets. Must be a power of two when the level is enabled.
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,

    /// Associativity (ways per set).
    #[serde(default = "CacheConfig::default_ways", alias = "assoc")]
    pub ways: usize,

    /// Hit time in cycles.
    #[serde(default = "CacheConfig::default_latency", alias = "hit_time")]
    pub latency: u64,
}

impl CacheConfig {
    /// Creates an enabled level description.
    pub const fn new(sets: usize, ways: usize, latency: u64) -> Self {
        Self {
            sets,
            ways,
            latency,
        }
    }

    /// Creates a disabled level description.
    pub const fn disabled() -> Self {
        Self::new(0, 0, defaults::HIT_TIME)
    }

    /// Returns `true` if the level has storage and takes part in lookups.
    pub const fn enabled(&self) -> bool {
        self.sets >= 1 && self.ways >= 1
    }

    /// Total number of lines the level can hold, or `None` if `sets * ways`
    /// does not fit in `usize`.
    pub const fn capacity_lines(&self) -> Option<usize> {
        self.sets.checked_mul(self.ways)
    }

    const fn default_sets() -> usize {
        defaults::SETS
    }

    const fn default_ways() -> usize {
        defaults::WAYS
    }

    const fn default_latency() -> u64 {
        defaults::HIT_TIME
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sets: defaults::SETS,
            ways: defaults::WAYS,
            latency: defaults::HIT_TIME,
        }
    }
}

impl FromStr for CacheConfig {
    type Err = ConfigError;

    /// Parses the `<sets>:<assoc>:<hit_time>` form, e.g. `"256:4:1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidLevelSpec(s.to_string());
        let mut fields = s.trim().split(':').map(str::trim);
        let mut next = || fields.next().ok_or_else(invalid);

        let sets = next()?.parse::<usize>().map_err(|_| invalid())?;
        let ways = next()?.parse::<usize>().map_err(|_| invalid())?;
        let latency = next()?.parse::<u64>().map_err(|_| invalid())?;
        if fields.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(sets, ways, latency))
    }
}

/// Root configuration: three cache levels plus the parameters they share.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{CacheConfig, HierarchyConfig};
///
/// let json = r#"{
///     "l1_i": { "sets": 256, "ways": 2, "latency": 1 },
///     "l1_d": { "sets": 256, "ways": 4, "latency": 1 },
///     "l2":   { "sets": 1024, "ways": 8, "latency": 10 },
///     "block_size": 64,
///     "mem_speed": 100,
///     "inclusive": true
/// }"#;
///
/// let config: HierarchyConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.l1_d, CacheConfig::new(256, 4, 1));
/// assert!(config.inclusive);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HierarchyConfig {
    /// Level-1 instruction cache.
    #[serde(default, alias = "icache")]
    pub l1_i: CacheConfig,

    /// Level-1 data cache.
    #[serde(default, alias = "dcache")]
    pub l1_d: CacheConfig,

    /// Shared level-2 cache.
    #[serde(default, alias = "l2cache")]
    pub l2: CacheConfig,

    /// Block size in bytes, shared by every level.
    #[serde(default = "HierarchyConfig::default_block_size", alias = "blocksize")]
    pub block_size: usize,

    /// Main memory latency in cycles.
    #[serde(default = "HierarchyConfig::default_mem_speed", alias = "memspeed")]
    pub mem_speed: u64,

    /// Whether the L2 strictly includes both L1 caches.
    #[serde(default)]
    pub inclusive: bool,
}

impl HierarchyConfig {
    const fn default_block_size() -> usize {
        defaults::BLOCK_SIZE
    }

    const fn default_mem_speed() -> u64 {
        defaults::MEM_SPEED
    }

    /// Returns the configuration of `level`.
    pub const fn level(&self, level: Level) -> &CacheConfig {
        match level {
            Level::Instruction => &self.l1_i,
            Level::Data => &self.l1_d,
            Level::L2 => &self.l2,
        }
    }

    /// Checks that the hierarchy can be simulated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BlockSizeNotPowerOfTwo`] if the block size is
    /// zero or not a power of two, and [`ConfigError::SetsNotPowerOfTwo`] for
    /// the first enabled level whose set count is not a power of two. Returns
    /// [`ConfigError::GeometryTooLarge`] for an enabled level whose line count
    /// overflows `usize` or whose set index needs more than 32 address bits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.block_size.is_power_of_two() {
            return Err(ConfigError::BlockSizeNotPowerOfTwo(self.block_size));
        }
        for level in Level::ALL {
            let cfg = self.level(level);
            if !cfg.enabled() {
                continue;
            }
            if !cfg.sets.is_power_of_two() {
                return Err(ConfigError::SetsNotPowerOfTwo {
                    level,
                    sets: cfg.sets,
                });
            }
            if cfg.capacity_lines().is_none() || ceil_log2(cfg.sets) > u32::BITS {
                return Err(ConfigError::GeometryTooLarge {
                    level,
                    sets: cfg.sets,
                    ways: cfg.ways,
                });
            }
        }
        Ok(())
    }
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            l1_i: CacheConfig::default(),
            l1_d: CacheConfig::default(),
            l2: CacheConfig::default(),
            block_size: defaults::BLOCK_SIZE,
            mem_speed: defaults::MEM_SPEED,
            inclusive: false,
        }
    }
}
