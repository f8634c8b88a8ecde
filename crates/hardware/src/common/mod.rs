//! Common types shared across the cache simulator.
//!
//! This module provides the building blocks used by every other component. It includes:
//! 1. **Address Layout:** Splitting addresses into block offset, set index, and tag.
//! 2. **Levels and Accesses:** Identifying cache levels and classifying trace records.
//! 3. **Error Handling:** Configuration and access error types.

/// Address decomposition (offset / set index / tag).
pub mod addr;

/// Cache level and access type definitions.
pub mod data;

/// Error types for configuration and access.
pub mod error;

pub use addr::{AddressLayout, Decomposed};
pub use data::{AccessType, Level};
pub use error::{AccessError, ConfigError};
