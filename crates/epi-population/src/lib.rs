//! `epi-population` — individuals and the per-location population container.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`person`]     | `Person`, `InfectionState`                                |
//! | [`population`] | `Population` (array-backed, id-indexed)                   |
//! | [`tally`]      | `InfectionTally` — per-state head counts                  |
//! | [`loader`]     | `load_roster_csv`, `load_roster_reader`                   |
//! | [`error`]      | `PopulationError`, `PopulationResult<T>`                  |
//!
//! # Ordering
//!
//! A location picks its migrating resident by index, so the order of the
//! container is part of the simulation's observable behaviour.  `Population`
//! keeps residents in a `Vec` and removes with `swap_remove`: the order after
//! any sequence of inserts and removals is a pure function of that sequence,
//! which is what replay under rollback requires.

pub mod error;
pub mod loader;
pub mod person;
pub mod population;
pub mod tally;

#[cfg(test)]
mod tests;

pub use error::{PopulationError, PopulationResult};
pub use loader::{RosterEntry, load_roster_csv, load_roster_reader};
pub use person::{InfectionState, Person};
pub use population::Population;
pub use tally::InfectionTally;
