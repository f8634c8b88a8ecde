//! Two-level cache hierarchy simulator library.
//!
//! This crate models split level-1 instruction and data caches backed by a
//! shared, optionally inclusive, level-2 cache, and reports the latency of
//! every access together with per-level hit/miss counters:
//! 1. **Core:** Address decomposition, set-associative lookup, LRU replacement, and inclusive back-invalidation.
//! 2. **Configuration:** Per-level geometry and timing, validated before any storage is allocated.
//! 3. **Statistics:** Per-level references, misses, and penalties with a text report.
//! 4. **Simulation:** Trace reader and replay driver.

/// Common types (address layout, levels, access types, errors).
pub mod common;
/// Hierarchy configuration (per-level geometry, shared block size and memory latency).
pub mod config;
/// Cache hierarchy engine (single-level caches, replacement, hierarchy orchestration).
pub mod core;
/// Trace reading and replay.
pub mod sim;
/// Per-level statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `HierarchyConfig::default()` or deserialize from JSON.
pub use crate::config::HierarchyConfig;
/// The cache hierarchy; construct with `Hierarchy::new`.
pub use crate::core::Hierarchy;
