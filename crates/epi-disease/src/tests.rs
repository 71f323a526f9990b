//! Unit tests for epi-disease.

use epi_core::{PersonId, Tick};
use epi_population::{InfectionState, Person, Population};

use crate::{DiseaseReaction, DwellTimeParams, DwellTimeReaction, NoopReaction, StageParams};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn person(id: u64, state: InfectionState, since: u64) -> Person {
    Person::new(PersonId(id), 1.0, false, state).with_timestamps(Tick(0), Tick(since))
}

fn state_of(pop: &Population, id: u64) -> InfectionState {
    pop.get_by_id(PersonId(id)).unwrap().infection_state
}

fn params() -> DwellTimeParams {
    DwellTimeParams {
        transmissibility:      1.0,
        latent:                StageParams::new(2, 0.0),
        incubating:            StageParams::new(3, 0.5),
        infectious:            StageParams::new(4, 1.0),
        asymptomatic:          StageParams::new(4, 0.5),
        asymptomatic_fraction: 0.25,
        vaccine_efficacy:      1.0,
    }
}

fn reaction() -> DwellTimeReaction {
    DwellTimeReaction::new(params()).unwrap()
}

// ── NoopReaction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod noop {
    use super::*;

    #[test]
    fn leaves_states_untouched() {
        let mut pop = Population::from_persons([
            person(1, InfectionState::Infectious, 0),
            person(2, InfectionState::Uninfected, 0),
        ])
        .unwrap();
        let before = pop.clone();
        NoopReaction.reaction(&mut pop, Tick(100), 0.0);
        assert_eq!(pop.as_slice(), before.as_slice());
    }
}

// ── Parameter validation ──────────────────────────────────────────────────────

#[cfg(test)]
mod validation {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(DwellTimeParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let mut p = params();
        p.transmissibility = -1.0;
        assert!(DwellTimeReaction::new(p).is_err());

        let mut p = params();
        p.asymptomatic_fraction = 1.5;
        assert!(DwellTimeReaction::new(p).is_err());

        let mut p = params();
        p.infectious.infectivity = f64::NAN;
        assert!(DwellTimeReaction::new(p).is_err());
    }
}

// ── Infection ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod infection {
    use super::*;

    #[test]
    fn no_force_no_infection() {
        let mut pop = Population::from_persons([
            person(1, InfectionState::Uninfected, 0),
            person(2, InfectionState::Recovered, 0),
        ])
        .unwrap();
        reaction().reaction(&mut pop, Tick(10), 0.0);
        assert_eq!(state_of(&pop, 1), InfectionState::Uninfected);
    }

    #[test]
    fn low_factor_infects_high_factor_does_not() {
        let make = || {
            Population::from_persons([
                person(1, InfectionState::Uninfected, 0),
                person(2, InfectionState::Infectious, 9),
            ])
            .unwrap()
        };
        // force = 1.0, p = 1 - e^-1 ≈ 0.632
        let mut pop = make();
        reaction().reaction(&mut pop, Tick(10), 0.5);
        assert_eq!(state_of(&pop, 1), InfectionState::Latent);
        assert_eq!(pop.get_by_id(PersonId(1)).unwrap().last_state_change, Tick(10));

        let mut pop = make();
        reaction().reaction(&mut pop, Tick(10), 0.7);
        assert_eq!(state_of(&pop, 1), InfectionState::Uninfected);
    }

    #[test]
    fn vaccination_protects() {
        let mut vaccinated = person(1, InfectionState::Uninfected, 0);
        vaccinated.vaccinated = true;
        let mut pop = Population::from_persons([vaccinated, person(2, InfectionState::Infectious, 9)])
            .unwrap();
        reaction().reaction(&mut pop, Tick(10), 0.0);
        assert_eq!(state_of(&pop, 1), InfectionState::Uninfected);
    }

    #[test]
    fn probability_grows_with_force() {
        let r = reaction();
        let p = person(1, InfectionState::Uninfected, 0);
        assert_eq!(r.infection_probability(&p, 0.0), 0.0);
        assert!(r.infection_probability(&p, 2.0) > r.infection_probability(&p, 1.0));
    }
}

// ── Progression ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod progression {
    use super::*;

    #[test]
    fn stages_advance_after_dwell_time() {
        let mut pop = Population::from_persons([
            person(1, InfectionState::Latent, 8),       // dwell 2 → due at 10
            person(2, InfectionState::Incubating, 8),   // dwell 3 → due at 11
            person(3, InfectionState::Infectious, 6),   // dwell 4 → due at 10
            person(4, InfectionState::Asymptomatic, 7), // dwell 4 → due at 11
            person(5, InfectionState::Recovered, 0),
        ])
        .unwrap();

        reaction().reaction(&mut pop, Tick(10), 0.9);
        assert_eq!(state_of(&pop, 1), InfectionState::Incubating);
        assert_eq!(state_of(&pop, 2), InfectionState::Incubating);
        assert_eq!(state_of(&pop, 3), InfectionState::Recovered);
        assert_eq!(state_of(&pop, 4), InfectionState::Asymptomatic);
        assert_eq!(state_of(&pop, 5), InfectionState::Recovered);

        reaction().reaction(&mut pop, Tick(11), 0.9);
        assert_eq!(state_of(&pop, 2), InfectionState::Infectious);
        assert_eq!(state_of(&pop, 4), InfectionState::Recovered);
        // Person 1 only just became incubating at T10.
        assert_eq!(state_of(&pop, 1), InfectionState::Incubating);
    }

    #[test]
    fn latent_branches_on_factor() {
        let mut pop = Population::from_persons([person(1, InfectionState::Latent, 0)]).unwrap();
        reaction().reaction(&mut pop, Tick(5), 0.1);
        assert_eq!(state_of(&pop, 1), InfectionState::Asymptomatic);
    }

    #[test]
    fn one_stage_per_update() {
        let mut pop = Population::from_persons([
            person(1, InfectionState::Uninfected, 0),
            person(2, InfectionState::Infectious, 0),
        ])
        .unwrap();
        reaction().reaction(&mut pop, Tick(100), 0.0);
        // Infected this update, not progressed past Latent.
        assert_eq!(state_of(&pop, 1), InfectionState::Latent);
        assert_eq!(state_of(&pop, 2), InfectionState::Recovered);
    }

    #[test]
    fn population_size_unchanged() {
        let mut pop = Population::from_persons(
            (0..20).map(|i| person(i, InfectionState::ALL[(i % 6) as usize], 0)),
        )
        .unwrap();
        reaction().reaction(&mut pop, Tick(50), 0.3);
        assert_eq!(pop.len(), 20);
        assert_eq!(pop.tally().total(), 20);
    }
}
