//! The `Location` event handler.

use std::fmt;
use std::sync::Arc;

use log::{debug, trace, warn};

use epi_core::{LocationId, LocationRng, RngCheckpoint, Tick};
use epi_disease::DiseaseReaction;
use epi_network::DiffusionNetwork;
use epi_population::{InfectionTally, Person, Population, PopulationError};

use crate::{EpidemicEvent, EventKind, LocationError, LocationResult};

// ── LocationSnapshot ──────────────────────────────────────────────────────────

/// Everything about a [`Location`] that event handling can change: the
/// residents, the RNG position, and the rejected-arrival counter.
///
/// Taken by the scheduler before speculative execution and handed back to
/// [`Location::restore`] to undo it.
#[derive(Clone, Debug)]
pub struct LocationSnapshot {
    population:        Population,
    rng:               RngCheckpoint,
    rejected_arrivals: u64,
}

impl LocationSnapshot {
    pub fn population(&self) -> &Population {
        &self.population
    }
}

// ── Location ──────────────────────────────────────────────────────────────────

/// One node of the contact network with its residents.
///
/// A location has no explicit phase: its behaviour is fully determined by
/// the event it receives, its residents, and its RNG position.  Handlers run
/// to completion synchronously and touch only this location's state.
#[derive(Clone)]
pub struct Location {
    id:                 LocationId,
    name:               String,
    population:         Population,
    reaction:           Arc<dyn DiseaseReaction>,
    diffusion:          DiffusionNetwork,
    rng:                LocationRng,
    refresh_interval:   u64,
    diffusion_interval: u64,
    rejected_arrivals:  u64,
}

impl Location {
    /// Create a location with no residents and no neighbors.
    ///
    /// # Errors
    ///
    /// [`LocationError::ZeroInterval`] if either trigger interval is zero
    /// (the trigger would reschedule itself at the same timestamp forever).
    pub fn new(
        id:                 LocationId,
        name:               impl Into<String>,
        refresh_interval:   u64,
        diffusion_interval: u64,
        reaction:           Arc<dyn DiseaseReaction>,
        rng:                LocationRng,
    ) -> LocationResult<Self> {
        let name = name.into();
        if refresh_interval == 0 {
            return Err(LocationError::ZeroInterval { location: name, what: "refresh interval" });
        }
        if diffusion_interval == 0 {
            return Err(LocationError::ZeroInterval { location: name, what: "diffusion interval" });
        }
        Ok(Self {
            id,
            name,
            population: Population::new(),
            reaction,
            diffusion: DiffusionNetwork::isolated(),
            rng,
            refresh_interval,
            diffusion_interval,
            rejected_arrivals: 0,
        })
    }

    /// Replace the resident population (setup only).
    pub fn with_population(mut self, population: Population) -> Self {
        self.population = population;
        self
    }

    /// Bind this location's view of the contact network (setup only).
    pub fn with_diffusion(mut self, diffusion: DiffusionNetwork) -> Self {
        self.diffusion = diffusion;
        self
    }

    // ── Scheduler boundary ────────────────────────────────────────────────

    /// The two recurring triggers, first due one interval after tick 0.
    pub fn initialize(&self) -> Vec<EpidemicEvent> {
        vec![
            EpidemicEvent::disease_update(self.id, Tick(self.refresh_interval)),
            EpidemicEvent::diffusion(self.id, Tick(self.diffusion_interval)),
        ]
    }

    /// Process one event and return the events it produces.
    ///
    /// # Errors
    ///
    /// - [`LocationError::Misrouted`] if `event.receiver` is not this
    ///   location.
    /// - [`LocationError::Network`] if the chosen neighbor has no travel
    ///   time (the diffusion view was built inconsistently).
    /// - [`LocationError::TimeOverflow`] if a reschedule or an arrival would
    ///   land past `u64::MAX`.  A resident is only removed once its arrival
    ///   time is known to fit.
    ///
    /// A duplicate arrival is *not* an error: it is logged, counted, and
    /// dropped, leaving the existing resident untouched.
    pub fn handle(&mut self, event: EpidemicEvent) -> LocationResult<Vec<EpidemicEvent>> {
        if event.receiver != self.id {
            return Err(LocationError::Misrouted { location: self.id, receiver: event.receiver });
        }
        let now = event.timestamp;

        match event.kind {
            EventKind::DiseaseUpdateTrigger => {
                let rand_factor = self.rng.unit();
                self.reaction.reaction(&mut self.population, now, rand_factor);
                let next = self.after(now, self.refresh_interval)?;
                Ok(vec![EpidemicEvent::disease_update(self.id, next)])
            }

            EventKind::DiffusionTrigger => {
                let next = self.after(now, self.diffusion_interval)?;
                let mut events = Vec::with_capacity(2);
                if let Some(migration) = self.diffuse(now)? {
                    events.push(migration);
                }
                events.push(EpidemicEvent::diffusion(self.id, next));
                Ok(events)
            }

            EventKind::Arrival(person) => {
                self.arrive(person, now)?;
                Ok(Vec::new())
            }
        }
    }

    /// Pick a destination, then a resident, and send the resident on its
    /// way.  Draw order: destination first, then resident.
    fn diffuse(&mut self, now: Tick) -> LocationResult<Option<EpidemicEvent>> {
        let Some(destination) = self.diffusion.pick_location(&mut self.rng) else {
            trace!("{} @ {now}: no neighbor, diffusion skipped", self.name);
            return Ok(None);
        };
        let travel_time = self.diffusion.travel_time_to_location(destination)?;
        let arrival = self.after(now, travel_time)?;

        if self.population.is_empty() {
            trace!("{} @ {now}: no residents, diffusion skipped", self.name);
            return Ok(None);
        }

        let index = self.diffusion.pick_person(&mut self.rng, self.population.len());
        let person = self.population.remove_at(index)?;
        debug!(
            "{} @ {now}: {} leaves for {destination}, arriving {arrival}",
            self.name,
            person.id(),
        );
        Ok(Some(EpidemicEvent::arrival(destination, arrival, person)))
    }

    fn after(&self, now: Tick, delay: u64) -> LocationResult<Tick> {
        now.checked_offset(delay)
            .ok_or(LocationError::TimeOverflow { location: self.id, now, delay })
    }

    fn arrive(&mut self, person: Person, now: Tick) -> LocationResult<()> {
        let id = person.id();
        match self.population.insert(person.arrived(now)) {
            Ok(()) => {
                trace!("{} @ {now}: {id} arrived", self.name);
                Ok(())
            }
            Err(PopulationError::DuplicatePerson(_)) => {
                self.rejected_arrivals += 1;
                warn!(
                    "{} ({}) @ {now}: rejected arrival of {id}: already a resident",
                    self.name, self.id,
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    // ── Rollback ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> LocationSnapshot {
        LocationSnapshot {
            population:        self.population.clone(),
            rng:               self.rng.checkpoint(),
            rejected_arrivals: self.rejected_arrivals,
        }
    }

    /// Return to the state captured by `snapshot`.
    pub fn restore(&mut self, snapshot: &LocationSnapshot) {
        self.population = snapshot.population.clone();
        self.rng.restore(&snapshot.rng);
        self.rejected_arrivals = snapshot.rejected_arrivals;
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> LocationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn tally(&self) -> InfectionTally {
        self.population.tally()
    }

    pub fn diffusion(&self) -> &DiffusionNetwork {
        &self.diffusion
    }

    pub fn refresh_interval(&self) -> u64 {
        self.refresh_interval
    }

    pub fn diffusion_interval(&self) -> u64 {
        self.diffusion_interval
    }

    /// Arrivals dropped because the person was already a resident.
    pub fn rejected_arrivals(&self) -> u64 {
        self.rejected_arrivals
    }

    /// Values drawn from this location's RNG so far.
    pub fn rng_draws(&self) -> u64 {
        self.rng.draws()
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Location")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("residents", &self.population.len())
            .field("neighbors", &self.diffusion.neighbors())
            .field("refresh_interval", &self.refresh_interval)
            .field("diffusion_interval", &self.diffusion_interval)
            .field("rejected_arrivals", &self.rejected_arrivals)
            .finish_non_exhaustive()
    }
}
