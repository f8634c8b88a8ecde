//! Functional units of the memory hierarchy.

/// Set-associative cache with replacement policies.
pub mod cache;
