//! Simulation observer trait for progress reporting and data collection.

use epi_core::Tick;
use epi_location::{EpidemicEvent, Location};
use epi_population::InfectionTally;

/// Callbacks invoked by [`Sim`][crate::Sim] while it delivers events.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: migration counter
///
/// ```rust,ignore
/// struct Migrations(usize);
///
/// impl SimObserver for Migrations {
///     fn on_event(&mut self, event: &EpidemicEvent) {
///         if event.tag() == EventTag::Arrival {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called for every event just before it is handed to its receiver, in
    /// delivery order.
    fn on_event(&mut self, _event: &EpidemicEvent) {}

    /// Called after all events of one wave (one timestamp) were processed.
    ///
    /// `processed` is the number of events delivered in the wave.
    fn on_wave_end(&mut self, _tick: Tick, _processed: usize, _locations: &[Location]) {}

    /// Called once when [`Sim::run_until`][crate::Sim::run_until] returns.
    fn on_sim_end(&mut self, _final_tick: Tick, _locations: &[Location]) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

// ── TallyObserver ─────────────────────────────────────────────────────────────

/// Records the aggregate [`InfectionTally`] over all locations at most once
/// per `interval` ticks, plus a final record at the end of the run.
///
/// A record is taken at the end of the first wave at or after each multiple
/// of `interval`.
#[derive(Clone, Debug)]
pub struct TallyObserver {
    interval: u64,
    next_due: Tick,
    records:  Vec<(Tick, InfectionTally)>,
}

impl TallyObserver {
    /// `interval == 0` is treated as 1 (record after every wave).
    pub fn new(interval: u64) -> Self {
        Self { interval: interval.max(1), next_due: Tick::ZERO, records: Vec::new() }
    }

    /// `(tick, tally)` pairs in the order they were taken.
    pub fn records(&self) -> &[(Tick, InfectionTally)] {
        &self.records
    }

    /// The most recent record, if any.
    pub fn last(&self) -> Option<&(Tick, InfectionTally)> {
        self.records.last()
    }

    fn record(&mut self, tick: Tick, locations: &[Location]) {
        let tally = locations.iter().map(Location::tally).sum();
        self.records.push((tick, tally));
    }
}

impl SimObserver for TallyObserver {
    fn on_wave_end(&mut self, tick: Tick, _processed: usize, locations: &[Location]) {
        if tick < self.next_due {
            return;
        }
        self.record(tick, locations);
        self.next_due = Tick((tick.0 / self.interval + 1).saturating_mul(self.interval));
    }

    fn on_sim_end(&mut self, final_tick: Tick, locations: &[Location]) {
        if self.records.last().is_none_or(|&(t, _)| t != final_tick) {
            self.record(final_tick, locations);
        }
    }
}
