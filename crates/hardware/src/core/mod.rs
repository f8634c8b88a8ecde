//! Cache hierarchy engine.
//!
//! This module contains the single-level cache model and the hierarchy that
//! connects the I$, D$, and L2$ to main memory.

/// The I$ / D$ / L2$ hierarchy and its access entry points.
pub mod hierarchy;

/// Cache units (set/way store and replacement policies).
pub mod units;

pub use self::hierarchy::Hierarchy;
