//! `epi-core` — foundational types for the small-world epidemic workspace.
//!
//! This crate is a dependency of every other `epi-*` crate.  It has no
//! `epi-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `PersonId`, `LocationId`                              |
//! | [`time`]        | `Tick`                                                |
//! | [`rng`]         | `LocationRng` (per-location, rewindable), `SimRng`    |
//! | [`error`]       | `EpiError`, `EpiResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `Tick`.          |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{EpiError, EpiResult};
pub use ids::{LocationId, PersonId};
pub use rng::{LocationRng, RngCheckpoint, SimRng};
pub use time::Tick;
