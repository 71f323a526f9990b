//! Per-state head counts for reporting.

use std::fmt;
use std::ops::{Add, AddAssign};

use crate::InfectionState;

/// Number of persons in each [`InfectionState`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfectionTally {
    counts: [usize; InfectionState::COUNT],
}

impl InfectionTally {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, state: InfectionState) -> usize {
        self.counts[state.code() as usize]
    }

    #[inline]
    pub fn record(&mut self, state: InfectionState) {
        self.counts[state.code() as usize] += 1;
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Persons in any state between infection and recovery.
    pub fn infected(&self) -> usize {
        InfectionState::ALL
            .into_iter()
            .filter(|s| s.is_infected())
            .map(|s| self.get(s))
            .sum()
    }

    /// `(state, count)` pairs in state-code order.
    pub fn iter(&self) -> impl Iterator<Item = (InfectionState, usize)> + '_ {
        InfectionState::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

impl FromIterator<InfectionState> for InfectionTally {
    fn from_iter<I: IntoIterator<Item = InfectionState>>(iter: I) -> Self {
        let mut tally = InfectionTally::new();
        for state in iter {
            tally.record(state);
        }
        tally
    }
}

impl AddAssign for InfectionTally {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.counts.iter_mut().zip(rhs.counts) {
            *a += b;
        }
    }
}

impl Add for InfectionTally {
    type Output = InfectionTally;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::iter::Sum for InfectionTally {
    fn sum<I: Iterator<Item = InfectionTally>>(iter: I) -> Self {
        iter.fold(InfectionTally::new(), Add::add)
    }
}

impl fmt::Display for InfectionTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (state, count) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{state}={count}")?;
        }
        Ok(())
    }
}
