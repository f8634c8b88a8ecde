//! Cache contents dump.
//!
//! Renders the set/way store of a [`CacheSim`] for debugging. Purely a view:
//! formatting never touches validity, tags, or recency ranks.

use std::fmt;

use super::CacheSim;

impl fmt::Display for CacheSim {
    /// One line per set, one cell per way:
    ///
    /// ```text
    /// Set 0: | V:1 Tag:0x2 lru:0 | V:0 Tag:0x0 lru:1 |
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, set) in self.sets().enumerate() {
            write!(f, "Set {index}: |")?;
            for way in set {
                write!(
                    f,
                    " V:{} Tag:{:#x} lru:{} |",
                    u8::from(way.valid),
                    way.tag,
                    way.lru_rank
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
