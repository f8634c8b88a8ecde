//! Cache statistics collection and reporting.
//!
//! This module tracks per-level performance counters for the hierarchy. It provides:
//! 1. **Raw counters:** References, misses, miss penalties, and back-invalidations per level.
//! 2. **Derived metrics:** Miss rate and average access time.
//! 3. **Reporting:** Section-selectable text report in the simulator's standard layout.
//!
//! The hierarchy only increments counters; formatting happens here, outside
//! the access path.

use std::io::{self, Write};

use crate::common::Level;
use crate::config::HierarchyConfig;

/// Counters for a single cache level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Accesses that reached this level.
    pub references: u64,
    /// Accesses that missed in this level.
    pub misses: u64,
    /// Cycles spent below this level servicing its misses.
    pub penalties: u64,
    /// Lines invalidated by an inclusive L2 eviction (L1 levels only).
    pub invalidations: u64,
}

impl CacheStats {
    /// Accesses that hit in this level.
    pub const fn hits(&self) -> u64 {
        self.references - self.misses
    }

    /// Fraction of references that missed, in `[0, 1]`; 0 with no references.
    pub fn miss_rate(&self) -> f64 {
        if self.references == 0 {
            0.0
        } else {
            self.misses as f64 / self.references as f64
        }
    }

    /// Average cycles per reference: `hit_time + penalties / references`.
    ///
    /// Returns 0 when the level saw no references.
    pub fn avg_access_time(&self, hit_time: u64) -> f64 {
        if self.references == 0 {
            0.0
        } else {
            hit_time as f64 + self.penalties as f64 / self.references as f64
        }
    }
}

/// Counters for the whole hierarchy, one [`CacheStats`] per level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HierarchyStats {
    /// Level-1 instruction cache counters.
    pub icache: CacheStats,
    /// Level-1 data cache counters.
    pub dcache: CacheStats,
    /// Level-2 cache counters.
    pub l2cache: CacheStats,
}

/// Separator printed after every section.
const SECTION_RULE: &str = "----------------------------------------------------------";

/// Section names for selective stats output.
///
/// Pass an empty slice to [`HierarchyStats::write_sections`] to write all sections.
pub const STATS_SECTIONS: &[&str] = &["icache", "dcache", "l2cache"];

impl HierarchyStats {
    /// Counters of `level`.
    pub const fn level(&self, level: Level) -> &CacheStats {
        match level {
            Level::Instruction => &self.icache,
            Level::Data => &self.dcache,
            Level::L2 => &self.l2cache,
        }
    }

    /// Mutable counters of `level`.
    pub fn level_mut(&mut self, level: Level) -> &mut CacheStats {
        match level {
            Level::Instruction => &mut self.icache,
            Level::Data => &mut self.dcache,
            Level::L2 => &mut self.l2cache,
        }
    }

    /// References that entered the hierarchy through either L1.
    pub const fn l1_references(&self) -> u64 {
        self.icache.references + self.dcache.references
    }

    /// Writes the requested statistics sections to `out`.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]; unknown
    /// names are ignored. Pass an empty slice to write every section. Levels
    /// disabled in `config` are reported as such.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from `out`.
    pub fn write_sections<W: Write>(
        &self,
        out: &mut W,
        config: &HierarchyConfig,
        sections: &[String],
    ) -> io::Result<()> {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        for level in Level::ALL {
            let name = level.name();
            if !want(name) {
                continue;
            }
            let cfg = config.level(level);
            let s = self.level(level);
            writeln!(out, "{}", name.to_uppercase())?;
            if !cfg.enabled() {
                writeln!(out, "  disabled")?;
                writeln!(out, "{SECTION_RULE}")?;
                continue;
            }
            writeln!(
                out,
                "  {name}.geometry         {} sets x {} ways",
                cfg.sets, cfg.ways
            )?;
            writeln!(out, "  {name}.accesses         {}", s.references)?;
            writeln!(out, "  {name}.misses           {}", s.misses)?;
            writeln!(out, "  {name}.penalties        {} cycles", s.penalties)?;
            writeln!(out, "  {name}.miss_rate        {:.2}%", s.miss_rate() * 100.0)?;
            writeln!(
                out,
                "  {name}.avg_access       {:.2} cycles",
                s.avg_access_time(cfg.latency)
            )?;
            if level.is_l1() && config.inclusive {
                writeln!(out, "  {name}.invalidations    {}", s.invalidations)?;
            }
            writeln!(out, "{SECTION_RULE}")?;
        }
        Ok(())
    }

    /// Prints the requested statistics sections to stdout.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error writing to stdout.
    pub fn print_sections(&self, config: &HierarchyConfig, sections: &[String]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_sections(&mut lock, config, sections)
    }
}
