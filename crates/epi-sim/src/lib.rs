//! `epi-sim` — reference scheduler for the small-world epidemic model.
//!
//! # Wave loop
//!
//! ```text
//! while next queued timestamp t < end:
//!   ① Drain     — remove every event at t, in EventKey order
//!                 (timestamp, receiver, sender, seq).
//!   ② Dispatch  — each receiver handles its events in order
//!                 (receivers in parallel with the `parallel` feature).
//!   ③ Enqueue   — produced events, in ascending sender order, each keyed
//!                 with the sender's next sequence number.
//! ```
//!
//! [`Sim::checkpoint`] / [`Sim::rollback`] capture and restore the queue,
//! the clock, the sequence counters, and every location (residents and RNG
//! position), so a rolled-back run replays bit-for-bit.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`queue`]    | `EventQueue`, `EventKey`                                  |
//! | [`sim`]      | `Sim`, `SimCheckpoint`                                    |
//! | [`builder`]  | `SimBuilder`                                              |
//! | [`config`]   | `SimConfig` and its JSON loader                           |
//! | [`observer`] | `SimObserver`, `NoopObserver`, `TallyObserver`            |
//! | [`error`]    | `SimError`, `SimResult<T>`                                |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Dispatches the locations of a wave on Rayon's pool.    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use epi_population::load_roster_csv;
//! use epi_sim::{load_config_json, SimBuilder, TallyObserver};
//!
//! let config = load_config_json(Path::new("run.json"))?;
//! let roster = load_roster_csv(Path::new("roster.csv"))?;
//! let mut sim = SimBuilder::new(config).roster(roster).build()?;
//! let mut tallies = TallyObserver::new(50);
//! sim.run(&mut tallies)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod queue;
pub mod sim;


pub use builder::SimBuilder;
pub use config::{LocationConfig, NetworkConfig, SimConfig, load_config_json, load_config_reader};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TallyObserver};
pub use queue::{EventKey, EventQueue};
pub use sim::{Sim, SimCheckpoint};
