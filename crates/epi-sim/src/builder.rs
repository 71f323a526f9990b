//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use log::{debug, info};
use rustc_hash::{FxHashMap, FxHashSet};

use epi_core::{LocationId, LocationRng, SimRng, Tick};
use epi_disease::{DiseaseReaction, DwellTimeReaction};
use epi_location::Location;
use epi_network::{DiffusionNetwork, SmallWorldNetwork};
use epi_population::{Person, Population, RosterEntry};

use crate::{EventQueue, Sim, SimConfig, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Inputs
///
/// | Method          | Default                                            |
/// |-----------------|----------------------------------------------------|
/// | `new(config)`   | required                                           |
/// | `.roster(v)`    | no residents anywhere                              |
/// | `.reaction(r)`  | `DwellTimeReaction` from `config.disease`          |
///
/// # Bootstrap order
///
/// 1. Validate the configuration.
/// 2. Build the small-world network over the configured locations, in
///    configuration order, with a `SimRng` seeded from `config.seed`.
/// 3. For each location: bind its neighbors and travel times, seed its
///    `LocationRng` from `(config.seed, id)`, and hand it its residents.
/// 4. Queue every location's initial triggers.
///
/// # Example
///
/// ```rust,ignore
/// let config = load_config_json(Path::new("run.json"))?;
/// let roster = load_roster_csv(Path::new("roster.csv"))?;
/// let mut sim = SimBuilder::new(config).roster(roster).build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:   SimConfig,
    roster:   Vec<RosterEntry>,
    reaction: Option<Arc<dyn DiseaseReaction>>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, roster: Vec::new(), reaction: None }
    }

    /// Supply the starting residents.  Rows for the same location keep their
    /// order, which fixes the initial resident order of that location.
    pub fn roster(mut self, roster: Vec<RosterEntry>) -> Self {
        self.roster = roster;
        self
    }

    /// Use `reaction` for every location instead of the configured
    /// dwell-time model.
    pub fn reaction(mut self, reaction: Arc<dyn DiseaseReaction>) -> Self {
        self.reaction = Some(reaction);
        self
    }

    /// Validate inputs, build the network and locations, and return a
    /// ready-to-run [`Sim`] with every initial trigger queued.
    ///
    /// # Errors
    ///
    /// - [`SimError::Config`] for invalid configuration values or a person
    ///   listed twice in the roster.
    /// - [`SimError::Network`] if the network cannot be built (too few
    ///   locations for `k`, `beta` out of range).
    /// - [`SimError::Disease`] for invalid dwell-time parameters.
    /// - [`SimError::UnknownRosterLocation`] for a roster row naming a
    ///   location that is not configured.
    pub fn build(self) -> SimResult<Sim> {
        let config = self.config;
        config.validate()?;

        let reaction: Arc<dyn DiseaseReaction> = match self.reaction {
            Some(r) => r,
            None    => Arc::new(DwellTimeReaction::new(config.disease.clone())?),
        };

        // ── Network ───────────────────────────────────────────────────────
        let mut network = SmallWorldNetwork::new(config.network.k, config.network.beta)?
            .with_mode(config.network.rewire);
        network.populate_nodes(config.locations.iter().map(|l| l.name.clone()))?;
        network.map_nodes(&mut SimRng::new(config.seed))?;
        info!(
            "network: {} locations, {} links (k={}, beta={}, {:?})",
            network.node_count(),
            network.edge_count(),
            config.network.k,
            config.network.beta,
            config.network.rewire,
        );

        // ── Residents ─────────────────────────────────────────────────────
        let mut by_name: FxHashMap<String, LocationId> = FxHashMap::default();
        for name in network.names() {
            if let Some(id) = network.index_of(name) {
                by_name.insert(name.clone(), id);
            }
        }
        let residents = assign_residents(self.roster, &by_name, config.locations.len())?;

        // ── Locations ─────────────────────────────────────────────────────
        let hub_times = config.hub_times();
        let mut locations = Vec::with_capacity(config.locations.len());
        for ((i, loc), persons) in config.locations.iter().enumerate().zip(residents) {
            let id = LocationId(i as u32);
            let population = Population::from_persons(persons)?;
            let diffusion = DiffusionNetwork::from_network(&network, id, &hub_times)?;
            debug!(
                "{}: {} residents, neighbors {:?}",
                loc.name,
                population.len(),
                diffusion.neighbors(),
            );
            let location = Location::new(
                id,
                loc.name.clone(),
                config.refresh_interval,
                loc.diffusion_interval,
                Arc::clone(&reaction),
                LocationRng::new(config.seed, id),
            )
            .map_err(|source| SimError::Location { location: id, source })?
            .with_population(population)
            .with_diffusion(diffusion);
            locations.push(location);
        }

        // ── Initial triggers ──────────────────────────────────────────────
        let mut queue = EventQueue::new();
        let mut seq = vec![0u64; locations.len()];
        for location in &locations {
            let sender = location.id();
            for event in location.initialize() {
                let next = &mut seq[sender.index()];
                queue.push(sender, *next, event);
                *next += 1;
            }
        }

        info!(
            "bootstrap complete: {} residents, {} initial events, end time {}",
            locations.iter().map(|l| l.population().len()).sum::<usize>(),
            queue.len(),
            config.end_time,
        );

        Ok(Sim {
            network,
            locations,
            by_name,
            queue,
            seq,
            now:       Tick::ZERO,
            end_time:  Tick(config.end_time),
            delivered: 0,
        })
    }
}

/// Split roster rows into per-location resident lists, indexed by
/// `LocationId`, keeping row order within each location.
fn assign_residents(
    roster:         Vec<RosterEntry>,
    by_name:        &FxHashMap<String, LocationId>,
    location_count: usize,
) -> SimResult<Vec<Vec<Person>>> {
    let mut residents: Vec<Vec<Person>> = vec![Vec::new(); location_count];
    let mut seen = FxHashSet::default();

    for entry in roster {
        let person_id = entry.person.id();
        let Some(&id) = by_name.get(&entry.location) else {
            return Err(SimError::UnknownRosterLocation {
                location: entry.location,
                person:   person_id,
            });
        };
        if !seen.insert(person_id) {
            return Err(SimError::Config(format!(
                "{person_id} appears more than once in the roster",
            )));
        }
        residents[id.index()].push(entry.person);
    }
    Ok(residents)
}
