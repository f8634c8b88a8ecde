//! Trace-driven simulation.
//!
//! Provides the trace reader and the driver that replays a trace through the
//! cache hierarchy.

/// Replay driver and run totals.
pub mod simulator;

/// Trace file format and reader.
pub mod trace;

pub use simulator::{RunSummary, SimError, Simulator};
pub use trace::{TraceError, TraceReader, TraceRecord};
