//! `epi-location` — the event-handling unit of the epidemic model.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`event`]    | `EpidemicEvent`, `EventKind` (tagged payload), `EventTag`     |
//! | [`location`] | `Location` handler, `LocationSnapshot`                        |
//! | [`error`]    | `LocationError`, `LocationResult<T>`                          |
//!
//! # Event protocol
//!
//! Every location keeps two self-rescheduling triggers alive and reacts to
//! migrations from its neighbors:
//!
//! ```text
//! DiseaseUpdateTrigger @t → reaction(population, t, u ~ U[0,1))
//!                           emit DiseaseUpdateTrigger @ t + refresh_interval
//! DiffusionTrigger @t     → dest = pick_location(); if dest and residents:
//!                             person = resident[pick_person(len)]
//!                             emit Arrival(person) → dest @ t + travel(dest)
//!                           emit DiffusionTrigger @ t + diffusion_interval
//! Arrival(person) @t      → insert person (arrival = t); nothing emitted
//! ```
//!
//! A location only ever mutates its own state; the only way state crosses
//! location boundaries is an `Arrival` event.

pub mod error;
pub mod event;
pub mod location;

#[cfg(test)]
mod tests;

pub use error::{LocationError, LocationResult};
pub use event::{EpidemicEvent, EventKind, EventTag};
pub use location::{Location, LocationSnapshot};
