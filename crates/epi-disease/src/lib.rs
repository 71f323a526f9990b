//! `epi-disease` — the disease-reaction collaborator.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`reaction`] | `DiseaseReaction` trait                                      |
//! | [`noop`]     | `NoopReaction` — leaves every state untouched                |
//! | [`dwell`]    | `DwellTimeReaction`, `DwellTimeParams`, `StageParams`        |
//! | [`error`]    | `DiseaseError`, `DiseaseResult<T>`                           |
//!
//! # Contract
//!
//! A location hands its whole population, the current timestamp, and one
//! uniform random factor in `[0, 1)` to the reaction on every disease-update
//! trigger.  The reaction mutates infection states in place and must be a
//! pure function of those three inputs: all randomness comes through the
//! factor, which the location draws from its own rewindable stream.

pub mod dwell;
pub mod error;
pub mod noop;
pub mod reaction;

#[cfg(test)]
mod tests;

pub use dwell::{DwellTimeParams, DwellTimeReaction, StageParams};
pub use error::{DiseaseError, DiseaseResult};
pub use noop::NoopReaction;
pub use reaction::DiseaseReaction;
