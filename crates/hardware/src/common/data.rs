//! Cache level and access classification.
//!
//! These types are used for the following:
//! 1. **Dispatch:** Selecting which L1 an access enters through and where a miss goes next.
//! 2. **Reporting:** Labelling statistics, dumps, and configuration errors by level.
//! 3. **Trace Replay:** Classifying each record of an address trace.

use std::fmt;

/// One cache in the two-level hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    /// Level-1 instruction cache (I$).
    Instruction,
    /// Level-1 data cache (D$).
    Data,
    /// Shared level-2 cache (L2$).
    L2,
}

impl Level {
    /// All levels, L1 first.
    pub const ALL: [Self; 3] = [Self::Instruction, Self::Data, Self::L2];

    /// Short report name of the level.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Instruction => "icache",
            Self::Data => "dcache",
            Self::L2 => "l2cache",
        }
    }

    /// Returns `true` for the two first-level caches.
    pub const fn is_l1(self) -> bool {
        matches!(self, Self::Instruction | Self::Data)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instruction => write!(f, "I$"),
            Self::Data => write!(f, "D$"),
            Self::L2 => write!(f, "L2$"),
        }
    }
}

/// Type of memory access issued to the hierarchy.
///
/// Writes are not distinguished from reads: the hierarchy tracks presence and
/// recency only, so a store and a load to the same block behave identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch; enters through the I$.
    Fetch,
    /// Load or store; enters through the D$.
    Data,
}

impl AccessType {
    /// The first-level cache this access enters through.
    pub const fn entry_level(self) -> Level {
        match self {
            Self::Fetch => Level::Instruction,
            Self::Data => Level::Data,
        }
    }
}
