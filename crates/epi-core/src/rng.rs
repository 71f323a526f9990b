//! Deterministic per-location and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each location gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (location_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive location IDs uniformly across the seed space.
//!
//! # Rollback
//!
//! A scheduler that executes events speculatively must be able to undo the
//! random draws made by the events it rolls back.  `LocationRng::checkpoint`
//! captures the full generator state (plus the draw counter) and
//! `LocationRng::restore` rewinds to it, so a replayed event sequence sees
//! exactly the same stream.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::LocationId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── RngCheckpoint ─────────────────────────────────────────────────────────────

/// Saved state of a [`LocationRng`].  Opaque; only useful to `restore`.
#[derive(Clone, Debug)]
pub struct RngCheckpoint {
    state: SmallRng,
    draws: u64,
}

impl RngCheckpoint {
    /// Number of draws the generator had made when the checkpoint was taken.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

// ── LocationRng ───────────────────────────────────────────────────────────────

/// Per-location deterministic RNG with checkpoint/restore.
///
/// Every handler call of a location receives `&mut` to this stream; there is
/// no hidden global generator.
#[derive(Clone, Debug)]
pub struct LocationRng {
    inner: SmallRng,
    draws: u64,
}

impl LocationRng {
    /// Seed deterministically from the run's global seed and a location ID.
    pub fn new(global_seed: u64, location: LocationId) -> Self {
        let seed = global_seed ^ (location.0 as u64).wrapping_mul(MIXING_CONSTANT);
        LocationRng { inner: SmallRng::seed_from_u64(seed), draws: 0 }
    }

    /// Uniform `f64` in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.draws += 1;
        self.inner.r#gen::<f64>()
    }

    /// Uniform index in `[0, len)`.
    ///
    /// # Panics
    /// Panics if `len == 0`.
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        self.draws += 1;
        self.inner.gen_range(0..len)
    }

    /// Total number of values drawn since seeding (restored by `restore`).
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Capture the current generator state.
    pub fn checkpoint(&self) -> RngCheckpoint {
        RngCheckpoint { state: self.inner.clone(), draws: self.draws }
    }

    /// Rewind to a previously captured state.
    pub fn restore(&mut self, checkpoint: &RngCheckpoint) {
        self.inner = checkpoint.state.clone();
        self.draws = checkpoint.draws;
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for one-off global operations such as network
/// construction.
///
/// Used only in single-threaded setup code.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
