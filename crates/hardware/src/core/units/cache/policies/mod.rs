//! Cache Replacement Policies.
//!
//! Implements the algorithm for selecting victim ways in set-associative caches.
//! Recency state lives in the ways themselves (`Way::lru_rank`), so a policy is
//! a stateless set of rules applied to one set's slice of ways.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used, with vacant ways filled before anything is evicted.

/// Least Recently Used replacement policy.
pub mod lru;

pub use lru::LruPolicy;

use super::Way;

/// Trait for cache replacement policies.
///
/// Defines the interface for seeding, updating, and querying the recency
/// state of a single set.
pub trait ReplacementPolicy: Send + Sync {
    /// Puts a freshly allocated set into its initial recency order.
    fn reset(&self, set: &mut [Way]);

    /// Updates the recency state when `way` is hit or installed.
    ///
    /// # Arguments
    ///
    /// * `set` - The ways of the accessed set.
    /// * `way` - The way index within the set that was accessed.
    fn update(&self, set: &mut [Way], way: usize);

    /// Selects the way to fill on a miss.
    ///
    /// # Arguments
    ///
    /// * `set` - The ways of the set being filled.
    ///
    /// # Returns
    ///
    /// The index of the way to (re)use.
    fn get_victim(&self, set: &[Way]) -> usize;
}
