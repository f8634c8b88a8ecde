//! Error definitions for the cache hierarchy.
//!
//! This module defines the failures the hierarchy reports to its callers. It provides:
//! 1. **Configuration Errors:** Raised by `initialize` when a geometry cannot be simulated.
//! 2. **Access Errors:** Raised by the access entry points when no valid hierarchy exists.
//!
//! Broken replacement-policy invariants are not represented here; they are
//! programming errors and are caught by assertions where they would occur.

use thiserror::Error;

use super::data::Level;

/// A cache hierarchy configuration that cannot be simulated.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The shared block size is zero or not a power of two.
    #[error("block size must be a positive power of two, got {0}")]
    BlockSizeNotPowerOfTwo(usize),

    /// An enabled level has a set count that is not a power of two.
    ///
    /// Set indices are carved from a whole number of address bits, so any
    /// other count leaves part of the index space without a backing set.
    #[error("{level} set count must be a power of two, got {sets}")]
    SetsNotPowerOfTwo {
        /// The offending cache level.
        level: Level,
        /// The rejected set count.
        sets: usize,
    },

    /// An enabled level is too large to index or allocate.
    ///
    /// Either `sets * ways` overflows `usize`, or the set index would need
    /// more than 32 address bits.
    #[error("{level} geometry of {sets} sets x {ways} ways is too large")]
    GeometryTooLarge {
        /// The offending cache level.
        level: Level,
        /// The rejected set count.
        sets: usize,
        /// The rejected associativity.
        ways: usize,
    },

    /// A `sets:assoc:hit_time` level description could not be parsed.
    #[error("invalid cache description {0:?}, expected <sets>:<assoc>:<hit_time>")]
    InvalidLevelSpec(String),
}

/// A failed access to the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The hierarchy was never initialized, or its last initialization failed.
    #[error("cache hierarchy is not initialized")]
    Uninitialized,
}
