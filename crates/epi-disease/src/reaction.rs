//! The `DiseaseReaction` trait — the main extension point for user code.

use epi_core::Tick;
use epi_population::Population;

/// Pluggable compartmental model.
///
/// Implementations advance the infection states of one location's residents.
/// A single reaction instance is shared by every location (behind an `Arc`)
/// and may be invoked from several worker threads at once, so it must be
/// `Send + Sync` and keep no mutable state of its own.
///
/// # Example
///
/// ```rust
/// use epi_core::Tick;
/// use epi_disease::DiseaseReaction;
/// use epi_population::{InfectionState, Population};
///
/// /// Everyone recovers on the first update.
/// struct Miracle;
///
/// impl DiseaseReaction for Miracle {
///     fn reaction(&self, population: &mut Population, now: Tick, _rand_factor: f64) {
///         for person in population.iter_mut() {
///             person.set_state(InfectionState::Recovered, now);
///         }
///     }
/// }
/// ```
pub trait DiseaseReaction: Send + Sync + 'static {
    /// Advance infection states of `population` as of `now`.
    ///
    /// `rand_factor` is uniform in `[0, 1)`.
    fn reaction(&self, population: &mut Population, now: Tick, rand_factor: f64);
}
