//! `epi-network` — small-world contact network and diffusion views.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`small_world`] | `SmallWorldNetwork` (ring lattice + rewiring), `RewireMode` |
//! | [`travel`]      | `TravelTimes` — per-location neighbor → duration table    |
//! | [`diffusion`]   | `DiffusionNetwork` — one location's view for migration    |
//! | [`error`]       | `NetworkError`, `NetworkResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `RewireMode`.           |
//!
//! # Lifecycle
//!
//! The network is generated once at setup (`populate_nodes`, then
//! `map_nodes`) and is immutable afterwards.  Each location then receives a
//! [`DiffusionNetwork`] built from its neighbor list and the travel-time
//! table, and never touches the shared graph again.

pub mod diffusion;
pub mod error;
pub mod small_world;
pub mod travel;


pub use diffusion::DiffusionNetwork;
pub use error::{NetworkError, NetworkResult};
pub use small_world::{BETA_PRECISION, RewireMode, RewireStats, SmallWorldNetwork};
pub use travel::TravelTimes;
