//! Unit tests for epi-location.

use std::sync::{Arc, Mutex};

use epi_core::{LocationId, LocationRng, PersonId, Tick};
use epi_disease::{DiseaseReaction, NoopReaction};
use epi_network::{DiffusionNetwork, TravelTimes};
use epi_population::{InfectionState, Person, Population};

use crate::{EpidemicEvent, EventKind, EventTag, Location, LocationError};

// ── Helpers ───────────────────────────────────────────────────────────────────

const X: LocationId = LocationId(0);
const Y: LocationId = LocationId(1);

fn person(id: u64) -> Person {
    Person::new(PersonId(id), 0.75, true, InfectionState::Incubating)
        .with_timestamps(Tick(3), Tick(42))
}

fn population(ids: &[u64]) -> Population {
    Population::from_persons(ids.iter().map(|&id| person(id))).unwrap()
}

fn location(id: LocationId, residents: &[u64]) -> Location {
    Location::new(id, format!("L{}", id.0), 10, 20, Arc::new(NoopReaction), LocationRng::new(1, id))
        .unwrap()
        .with_population(population(residents))
}

/// X has a single neighbor Y, 15 ticks away.
fn x_linked_to_y(residents: &[u64]) -> Location {
    let travel: TravelTimes = [(Y, 15)].into_iter().collect();
    location(X, residents).with_diffusion(DiffusionNetwork::new(vec![Y], travel).unwrap())
}

/// Records every invocation: (timestamp, population size, factor).
#[derive(Default)]
struct RecordingReaction {
    calls: Mutex<Vec<(Tick, usize, f64)>>,
}

impl DiseaseReaction for RecordingReaction {
    fn reaction(&self, population: &mut Population, now: Tick, rand_factor: f64) {
        self.calls.lock().unwrap().push((now, population.len(), rand_factor));
        // Leave a visible mark so later calls see the state of earlier ones.
        for p in population.iter_mut() {
            p.set_state(InfectionState::Recovered, now);
        }
    }
}

// ── Initialization & routing ──────────────────────────────────────────────────

#[cfg(test)]
mod setup {
    use super::*;

    #[test]
    fn initialize_schedules_both_triggers() {
        let events = location(X, &[]).initialize();
        assert_eq!(
            events,
            vec![
                EpidemicEvent::disease_update(X, Tick(10)),
                EpidemicEvent::diffusion(X, Tick(20)),
            ]
        );
    }

    #[test]
    fn zero_intervals_rejected() {
        let rng = || LocationRng::new(0, X);
        let err = Location::new(X, "X", 0, 5, Arc::new(NoopReaction), rng()).unwrap_err();
        assert!(matches!(err, LocationError::ZeroInterval { what: "refresh interval", .. }));
        let err = Location::new(X, "X", 5, 0, Arc::new(NoopReaction), rng()).unwrap_err();
        assert!(matches!(err, LocationError::ZeroInterval { what: "diffusion interval", .. }));
    }

    #[test]
    fn misrouted_event_is_an_error() {
        let mut x = location(X, &[1]);
        let err = x.handle(EpidemicEvent::diffusion(Y, Tick(5))).unwrap_err();
        assert!(matches!(err, LocationError::Misrouted { location: X, receiver: Y }));
    }

    #[test]
    fn event_tags() {
        assert_eq!(EpidemicEvent::disease_update(X, Tick(0)).tag(), EventTag::DiseaseUpdateTrigger);
        assert_eq!(EpidemicEvent::diffusion(X, Tick(0)).tag(), EventTag::DiffusionTrigger);
        assert_eq!(EpidemicEvent::arrival(X, Tick(0), person(1)).tag(), EventTag::Arrival);
        assert_eq!(EventTag::Arrival.to_string(), "arrival");
    }
}

// ── Disease updates ───────────────────────────────────────────────────────────

#[cfg(test)]
mod disease_update {
    use super::*;

    #[test]
    fn reschedules_after_refresh_interval() {
        let mut x = location(X, &[1, 2]);
        let out = x.handle(EpidemicEvent::disease_update(X, Tick(30))).unwrap();
        assert_eq!(out, vec![EpidemicEvent::disease_update(X, Tick(40))]);
        assert_eq!(x.rng_draws(), 1);
    }

    #[test]
    fn back_to_back_triggers_invoke_reaction_twice() {
        let recorder = Arc::new(RecordingReaction::default());
        let reaction: Arc<dyn DiseaseReaction> = recorder.clone();
        let mut x = Location::new(X, "X", 10, 20, reaction, LocationRng::new(9, X))
            .unwrap()
            .with_population(population(&[1, 2, 3]));

        x.handle(EpidemicEvent::disease_update(X, Tick(10))).unwrap();
        let after_first = x.population().clone();
        x.handle(EpidemicEvent::disease_update(X, Tick(10))).unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, Tick(10));
        assert_eq!(calls[1].0, Tick(10));
        assert_eq!(calls[0].1, 3);
        assert_eq!(calls[1].1, 3);
        assert!((0.0..1.0).contains(&calls[0].2));
        // Each call drew its own factor from the location's stream.
        assert_ne!(calls[0].2.to_bits(), calls[1].2.to_bits());
        // The second call saw the first call's changes.
        assert_eq!(after_first.tally().get(InfectionState::Recovered), 3);
        assert_eq!(x.tally().get(InfectionState::Recovered), 3);
    }

    #[test]
    fn reschedule_past_end_of_time_is_an_error() {
        let mut x = location(X, &[1]);
        let err = x.handle(EpidemicEvent::disease_update(X, Tick(u64::MAX - 5))).unwrap_err();
        assert!(matches!(
            err,
            LocationError::TimeOverflow { location: X, now: Tick(n), delay: 10 } if n == u64::MAX - 5
        ));
    }
}

// ── Diffusion ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod diffusion {
    use super::*;

    #[test]
    fn isolated_location_keeps_everyone() {
        let mut x = location(X, &[1, 2, 3]);
        let out = x.handle(EpidemicEvent::diffusion(X, Tick(50))).unwrap();
        assert_eq!(out, vec![EpidemicEvent::diffusion(X, Tick(70))]);
        assert_eq!(x.population().len(), 3);
        assert_eq!(x.rng_draws(), 0);
    }

    #[test]
    fn single_resident_migrates_with_travel_time() {
        let mut x = x_linked_to_y(&[7]);
        let out = x.handle(EpidemicEvent::diffusion(X, Tick(100))).unwrap();

        assert!(x.population().is_empty());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].receiver, Y);
        assert_eq!(out[0].timestamp, Tick(115));
        match &out[0].kind {
            EventKind::Arrival(p) => assert_eq!(p.id(), PersonId(7)),
            other => panic!("expected arrival, got {other:?}"),
        }
        assert_eq!(out[1], EpidemicEvent::diffusion(X, Tick(120)));
    }

    #[test]
    fn empty_population_emits_only_the_trigger() {
        let mut x = x_linked_to_y(&[]);
        let out = x.handle(EpidemicEvent::diffusion(X, Tick(100))).unwrap();
        assert_eq!(out, vec![EpidemicEvent::diffusion(X, Tick(120))]);
        // The destination was still drawn.
        assert_eq!(x.rng_draws(), 1);
    }

    #[test]
    fn one_resident_leaves_per_trigger() {
        let mut x = x_linked_to_y(&[1, 2, 3, 4, 5]);
        let mut departed = Vec::new();
        for t in 1..=5u64 {
            let out = x.handle(EpidemicEvent::diffusion(X, Tick(t * 20))).unwrap();
            if let EventKind::Arrival(p) = &out[0].kind {
                departed.push(p.id().0);
            }
            assert_eq!(x.population().len(), 5 - t as usize);
        }
        departed.sort_unstable();
        assert_eq!(departed, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn travel_past_end_of_time_keeps_the_resident() {
        let travel: TravelTimes = [(Y, u64::MAX)].into_iter().collect();
        let mut x = location(X, &[7])
            .with_diffusion(DiffusionNetwork::new(vec![Y], travel).unwrap());

        let err = x.handle(EpidemicEvent::diffusion(X, Tick(100))).unwrap_err();
        assert!(matches!(
            err,
            LocationError::TimeOverflow { location: X, now: Tick(100), delay: u64::MAX }
        ));
        assert_eq!(x.population().len(), 1);
        assert!(x.population().contains(PersonId(7)));
    }

    #[test]
    fn selection_replays_identically() {
        let run = || {
            let mut x = x_linked_to_y(&(0..40).collect::<Vec<_>>());
            (1..=20u64)
                .filter_map(|t| {
                    let out = x.handle(EpidemicEvent::diffusion(X, Tick(t))).unwrap();
                    match &out[0].kind {
                        EventKind::Arrival(p) => Some(p.id()),
                        _ => None,
                    }
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}

// ── Arrivals ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod arrival {
    use super::*;

    #[test]
    fn migration_preserves_attributes() {
        let mut x = x_linked_to_y(&[7]);
        let mut y = location(Y, &[]);
        let original = x.population().get(0).unwrap().clone();

        let out = x.handle(EpidemicEvent::diffusion(X, Tick(100))).unwrap();
        let produced = y.handle(out[0].clone()).unwrap();
        assert!(produced.is_empty());

        let landed = y.population().get_by_id(PersonId(7)).unwrap();
        assert_eq!(landed.id(), original.id());
        assert_eq!(landed.susceptibility, original.susceptibility);
        assert_eq!(landed.vaccinated, original.vaccinated);
        assert_eq!(landed.infection_state, original.infection_state);
        assert_eq!(landed.last_state_change, Tick(42));
        assert_eq!(landed.arrival, Tick(115));
    }

    #[test]
    fn duplicate_arrival_is_rejected_and_counted() {
        let mut y = location(Y, &[7]);
        let mut impostor = person(7);
        impostor.susceptibility = 0.01;

        let out = y.handle(EpidemicEvent::arrival(Y, Tick(60), impostor)).unwrap();
        assert!(out.is_empty());
        assert_eq!(y.population().len(), 1);
        assert_eq!(y.population().get_by_id(PersonId(7)).unwrap().susceptibility, 0.75);
        assert_eq!(y.rejected_arrivals(), 1);
    }

    #[test]
    fn ids_unique_after_any_sequence() {
        let mut y = location(Y, &[1, 2]);
        for (t, id) in [(1u64, 3u64), (2, 1), (3, 3), (4, 4), (5, 2)] {
            y.handle(EpidemicEvent::arrival(Y, Tick(t), person(id))).unwrap();
        }
        let mut ids: Vec<u64> = y.population().iter().map(|p| p.id().0).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(y.rejected_arrivals(), 3);
    }
}

// ── Snapshot / restore ────────────────────────────────────────────────────────

#[cfg(test)]
mod rollback {
    use super::*;

    #[test]
    fn restore_undoes_events_and_replays_identically() {
        let mut x = x_linked_to_y(&(0..10).collect::<Vec<_>>());
        x.handle(EpidemicEvent::diffusion(X, Tick(20))).unwrap();
        let saved = x.snapshot();
        assert_eq!(saved.population().len(), 9);

        let first: Vec<_> = (3..8u64)
            .map(|t| x.handle(EpidemicEvent::diffusion(X, Tick(t * 20))).unwrap())
            .collect();
        x.handle(EpidemicEvent::arrival(X, Tick(200), person(99))).unwrap();

        x.restore(&saved);
        assert_eq!(x.population().len(), 9);
        assert!(!x.population().contains(PersonId(99)));

        let second: Vec<_> = (3..8u64)
            .map(|t| x.handle(EpidemicEvent::diffusion(X, Tick(t * 20))).unwrap())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn restore_resets_rejection_counter() {
        let mut y = location(Y, &[1]);
        let saved = y.snapshot();
        y.handle(EpidemicEvent::arrival(Y, Tick(5), person(1))).unwrap();
        assert_eq!(y.rejected_arrivals(), 1);
        y.restore(&saved);
        assert_eq!(y.rejected_arrivals(), 0);
    }
}
