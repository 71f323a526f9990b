//! A no-op reaction — infection states never change.

use epi_core::Tick;
use epi_population::Population;

use crate::DiseaseReaction;

/// A [`DiseaseReaction`] that leaves the population untouched.
///
/// Useful in tests and for pure migration studies.
pub struct NoopReaction;

impl DiseaseReaction for NoopReaction {
    fn reaction(&self, _population: &mut Population, _now: Tick, _rand_factor: f64) {}
}
