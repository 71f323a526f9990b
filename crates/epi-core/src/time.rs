//! Simulation time model.
//!
//! Time is an integer `Tick` counter with no wall-clock mapping.  Trigger
//! intervals and travel durations are plain `u64` tick counts, so all
//! timestamp arithmetic is exact and comparisons are O(1).
//!
//! Advancing a tick is checked: a delay that would run past `u64::MAX` is
//! reported to the caller instead of wrapping to an earlier timestamp.

use std::fmt;

/// An absolute simulation timestamp.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The tick `n` steps after `self`, or `None` past the end of time.
    #[inline]
    pub fn checked_offset(self, n: u64) -> Option<Tick> {
        self.0.checked_add(n).map(Tick)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
