//! Trace replay driver.
//!
//! Owns a [`Hierarchy`] and feeds it the records of an address trace,
//! keeping run totals alongside the hierarchy's per-level counters.

use std::io::{self, Write};

use tracing::info;

use super::trace::{TraceError, TraceRecord};
use crate::common::{AccessError, AccessType, ConfigError};
use crate::config::HierarchyConfig;
use crate::core::Hierarchy;

/// Failure while replaying a trace.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The trace could not be read.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// The hierarchy rejected an access.
    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Totals over one trace run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Instruction fetches replayed.
    pub instruction_accesses: u64,
    /// Data accesses replayed.
    pub data_accesses: u64,
    /// Sum of the latency of every access, in cycles.
    pub total_cycles: u64,
}

impl RunSummary {
    /// Accesses of either kind.
    pub const fn total_accesses(&self) -> u64 {
        self.instruction_accesses + self.data_accesses
    }

    /// Average latency per access; 0 for an empty run.
    pub fn avg_latency(&self) -> f64 {
        match self.total_accesses() {
            0 => 0.0,
            n => self.total_cycles as f64 / n as f64,
        }
    }

    /// Writes the summary section of the statistics report.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from `out`.
    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "==========================================================")?;
        writeln!(out, "CACHE HIERARCHY SIMULATION STATISTICS")?;
        writeln!(out, "==========================================================")?;
        writeln!(out, "sim_accesses             {}", self.total_accesses())?;
        writeln!(out, "sim_inst_accesses        {}", self.instruction_accesses)?;
        writeln!(out, "sim_data_accesses        {}", self.data_accesses)?;
        writeln!(out, "sim_cycles               {}", self.total_cycles)?;
        writeln!(out, "sim_avg_latency          {:.4}", self.avg_latency())?;
        writeln!(out, "----------------------------------------------------------")?;
        Ok(())
    }
}

/// Top-level simulator: cache hierarchy plus run totals.
#[derive(Debug)]
pub struct Simulator {
    /// The simulated hierarchy.
    pub hierarchy: Hierarchy,
    /// Totals accumulated by [`step`](Self::step).
    pub summary: RunSummary,
}

impl Simulator {
    /// Creates a simulator over a freshly initialized hierarchy.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of an invalid configuration.
    pub fn new(config: &HierarchyConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            hierarchy: Hierarchy::new(config)?,
            summary: RunSummary::default(),
        })
    }

    /// Replays one record and returns its latency.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Uninitialized`] if the hierarchy was released.
    pub fn step(&mut self, record: TraceRecord) -> Result<u64, AccessError> {
        let latency = self.hierarchy.access(record.access, record.addr)?;
        match record.access {
            AccessType::Fetch => self.summary.instruction_accesses += 1,
            AccessType::Data => self.summary.data_accesses += 1,
        }
        self.summary.total_cycles = self.summary.total_cycles.saturating_add(latency);
        Ok(latency)
    }

    /// Replays every record of `trace`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first trace or access error encountered.
    pub fn run<I>(&mut self, trace: I) -> Result<RunSummary, SimError>
    where
        I: IntoIterator<Item = Result<TraceRecord, TraceError>>,
    {
        for record in trace {
            let _ = self.step(record?)?;
        }
        info!(
            accesses = self.summary.total_accesses(),
            cycles = self.summary.total_cycles,
            "trace replay finished"
        );
        Ok(self.summary)
    }
}
