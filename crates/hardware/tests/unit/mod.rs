//! # Unit Components
//!
//! Fine-grained tests for each building block of the simulator.





/// Unit tests for statistics counters and reporting.
pub mod stats;
