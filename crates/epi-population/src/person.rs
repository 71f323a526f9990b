//! One individual and its infection state.

use std::fmt;
use std::str::FromStr;

use epi_core::{PersonId, Tick};

use crate::PopulationError;

// ── InfectionState ────────────────────────────────────────────────────────────

/// Compartment an individual is in.  Exactly one at any time.
///
/// The numeric codes (`0..=5`, in declaration order) are the ones used by
/// roster files.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfectionState {
    #[default]
    Uninfected,
    Latent,
    Incubating,
    Infectious,
    Asymptomatic,
    Recovered,
}

impl InfectionState {
    /// Number of distinct states.
    pub const COUNT: usize = 6;

    /// Every state, in code order.
    pub const ALL: [InfectionState; Self::COUNT] = [
        InfectionState::Uninfected,
        InfectionState::Latent,
        InfectionState::Incubating,
        InfectionState::Infectious,
        InfectionState::Asymptomatic,
        InfectionState::Recovered,
    ];

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// `true` for every state between infection and recovery.
    pub fn is_infected(self) -> bool {
        !matches!(self, InfectionState::Uninfected | InfectionState::Recovered)
    }

    pub fn name(self) -> &'static str {
        match self {
            InfectionState::Uninfected   => "uninfected",
            InfectionState::Latent       => "latent",
            InfectionState::Incubating   => "incubating",
            InfectionState::Infectious   => "infectious",
            InfectionState::Asymptomatic => "asymptomatic",
            InfectionState::Recovered    => "recovered",
        }
    }
}

impl TryFrom<u8> for InfectionState {
    type Error = PopulationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(PopulationError::UnknownState(code.to_string()))
    }
}

impl FromStr for InfectionState {
    type Err = PopulationError;

    /// Accepts either the numeric code or the (case-insensitive) state name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return InfectionState::try_from(code);
        }
        Self::ALL
            .into_iter()
            .find(|state| state.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PopulationError::UnknownState(s.to_string()))
    }
}

impl fmt::Display for InfectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Person ────────────────────────────────────────────────────────────────────

/// One individual.
///
/// The id is fixed at construction; a population indexes residents by id, so
/// it is exposed read-only.  The remaining attributes are plain fields that
/// the disease-reaction collaborator mutates in place.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Person {
    id: PersonId,

    /// Relative susceptibility to infection (model-specific unit).
    pub susceptibility: f64,

    pub vaccinated: bool,

    pub infection_state: InfectionState,

    /// Timestamp at which the person arrived at its current location.
    pub arrival: Tick,

    /// Timestamp of the last infection-state change.
    pub last_state_change: Tick,
}

impl Person {
    pub fn new(
        id:              PersonId,
        susceptibility:  f64,
        vaccinated:      bool,
        infection_state: InfectionState,
    ) -> Self {
        Self {
            id,
            susceptibility,
            vaccinated,
            infection_state,
            arrival:           Tick::ZERO,
            last_state_change: Tick::ZERO,
        }
    }

    /// Builder-style setter for both timestamps; used when reconstructing a
    /// person from a migration payload or a saved state.
    pub fn with_timestamps(mut self, arrival: Tick, last_state_change: Tick) -> Self {
        self.arrival = arrival;
        self.last_state_change = last_state_change;
        self
    }

    #[inline]
    pub fn id(&self) -> PersonId {
        self.id
    }

    /// The same person, arrived at a new location at `arrival`.  Every other
    /// attribute, including `last_state_change`, is carried over unchanged.
    pub fn arrived(mut self, arrival: Tick) -> Self {
        self.arrival = arrival;
        self
    }

    /// Move to `state` at `now`.  The state-change timestamp never moves
    /// backwards.
    pub fn set_state(&mut self, state: InfectionState, now: Tick) {
        self.infection_state = state;
        self.last_state_change = self.last_state_change.max(now);
    }

    /// Ticks spent in the current state as of `now`.
    #[inline]
    pub fn time_in_state(&self, now: Tick) -> u64 {
        now.since(self.last_state_change)
    }
}
