//! Unit tests for epi-population.

use epi_core::{PersonId, Tick};

use crate::{InfectionState, Person, Population};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn person(id: u64) -> Person {
    Person::new(PersonId(id), 0.5, false, InfectionState::Uninfected)
}

fn population(ids: &[u64]) -> Population {
    Population::from_persons(ids.iter().map(|&id| person(id))).unwrap()
}

fn ids(pop: &Population) -> Vec<u64> {
    pop.iter().map(|p| p.id().0).collect()
}

// ── InfectionState ────────────────────────────────────────────────────────────

#[cfg(test)]
mod infection_state {
    use super::*;

    #[test]
    fn codes_follow_declaration_order() {
        for (i, state) in InfectionState::ALL.into_iter().enumerate() {
            assert_eq!(state.code() as usize, i);
            assert_eq!(InfectionState::try_from(i as u8).unwrap(), state);
        }
        assert!(InfectionState::try_from(6).is_err());
    }

    #[test]
    fn parse_code_or_name() {
        assert_eq!("3".parse::<InfectionState>().unwrap(), InfectionState::Infectious);
        assert_eq!("Recovered".parse::<InfectionState>().unwrap(), InfectionState::Recovered);
        assert_eq!(" latent ".parse::<InfectionState>().unwrap(), InfectionState::Latent);
        assert!("zombie".parse::<InfectionState>().is_err());
    }

    #[test]
    fn infected_classification() {
        assert!(!InfectionState::Uninfected.is_infected());
        assert!(InfectionState::Latent.is_infected());
        assert!(InfectionState::Asymptomatic.is_infected());
        assert!(!InfectionState::Recovered.is_infected());
    }
}

// ── Person ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod person {
    use super::*;

    #[test]
    fn arrived_only_changes_arrival() {
        let p = Person::new(PersonId(7), 0.25, true, InfectionState::Incubating)
            .with_timestamps(Tick(10), Tick(40));
        let moved = p.clone().arrived(Tick(115));

        assert_eq!(moved.id(), p.id());
        assert_eq!(moved.susceptibility, p.susceptibility);
        assert_eq!(moved.vaccinated, p.vaccinated);
        assert_eq!(moved.infection_state, p.infection_state);
        assert_eq!(moved.last_state_change, Tick(40));
        assert_eq!(moved.arrival, Tick(115));
    }

    #[test]
    fn set_state_timestamp_is_monotonic() {
        let mut p = person(1).with_timestamps(Tick(0), Tick(50));
        p.set_state(InfectionState::Latent, Tick(60));
        assert_eq!(p.last_state_change, Tick(60));
        p.set_state(InfectionState::Incubating, Tick(55));
        assert_eq!(p.infection_state, InfectionState::Incubating);
        assert_eq!(p.last_state_change, Tick(60));
        assert_eq!(p.time_in_state(Tick(70)), 10);
    }
}

// ── Population ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod container {
    use super::*;
    use crate::PopulationError;

    #[test]
    fn insert_and_lookup() {
        let pop = population(&[4, 8, 15]);
        assert_eq!(pop.len(), 3);
        assert!(pop.contains(PersonId(8)));
        assert_eq!(pop.get(2).unwrap().id(), PersonId(15));
        assert_eq!(pop.get_by_id(PersonId(4)).unwrap().id(), PersonId(4));
        assert!(pop.get(3).is_none());
    }

    #[test]
    fn duplicate_insert_rejected_and_state_kept() {
        let mut pop = population(&[1, 2]);
        let mut clash = person(2);
        clash.susceptibility = 0.99;

        let err = pop.insert(clash).unwrap_err();
        assert!(matches!(err, PopulationError::DuplicatePerson(PersonId(2))));
        assert_eq!(pop.len(), 2);
        assert_eq!(pop.get_by_id(PersonId(2)).unwrap().susceptibility, 0.5);
    }

    #[test]
    fn from_persons_rejects_duplicates() {
        let result = Population::from_persons([person(1), person(1)]);
        assert!(result.is_err());
    }

    #[test]
    fn remove_at_swaps_last_into_slot() {
        let mut pop = population(&[10, 20, 30, 40]);
        let removed = pop.remove_at(1).unwrap();
        assert_eq!(removed.id(), PersonId(20));
        assert_eq!(ids(&pop), vec![10, 40, 30]);
        // Slot index follows the moved resident.
        assert_eq!(pop.get_by_id(PersonId(40)).unwrap().id(), PersonId(40));
        assert_eq!(pop.remove(PersonId(40)).unwrap().id(), PersonId(40));
        assert_eq!(ids(&pop), vec![10, 30]);
    }

    #[test]
    fn remove_last_and_only() {
        let mut pop = population(&[5]);
        assert_eq!(pop.remove_at(0).unwrap().id(), PersonId(5));
        assert!(pop.is_empty());
        assert!(!pop.contains(PersonId(5)));
    }

    #[test]
    fn remove_errors() {
        let mut pop = population(&[1]);
        assert!(matches!(
            pop.remove_at(3),
            Err(PopulationError::IndexOutOfRange { index: 3, len: 1 })
        ));
        assert!(matches!(pop.remove(PersonId(9)), Err(PopulationError::NotFound(_))));
    }

    #[test]
    fn order_is_a_function_of_the_operation_sequence() {
        let run = || {
            let mut pop = population(&[1, 2, 3, 4, 5]);
            pop.remove_at(0).unwrap();
            pop.insert(person(6)).unwrap();
            pop.remove(PersonId(3)).unwrap();
            pop.insert(person(7)).unwrap();
            ids(&pop)
        };
        assert_eq!(run(), run());
        assert_eq!(run(), vec![5, 2, 6, 4, 7]);
    }

    #[test]
    fn ids_stay_unique_under_churn() {
        let mut pop = Population::new();
        for round in 0..50u64 {
            let _ = pop.insert(person(round % 7));
            if round % 3 == 0 && !pop.is_empty() {
                pop.remove_at((round as usize) % pop.len()).unwrap();
            }
            let mut seen: Vec<u64> = ids(&pop);
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), pop.len());
        }
    }

    #[test]
    fn iter_mut_updates_states() {
        let mut pop = population(&[1, 2]);
        for p in pop.iter_mut() {
            p.set_state(InfectionState::Recovered, Tick(3));
        }
        assert_eq!(pop.tally().get(InfectionState::Recovered), 2);
    }
}

// ── InfectionTally ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tally {
    use super::*;
    use crate::InfectionTally;

    #[test]
    fn counts_by_state() {
        let mut pop = population(&[1, 2, 3]);
        pop.get_by_id_mut(PersonId(2)).unwrap().infection_state = InfectionState::Infectious;
        let t = pop.tally();
        assert_eq!(t.get(InfectionState::Uninfected), 2);
        assert_eq!(t.get(InfectionState::Infectious), 1);
        assert_eq!(t.total(), 3);
        assert_eq!(t.infected(), 1);
    }

    #[test]
    fn sum_of_tallies() {
        let a: InfectionTally = [InfectionState::Latent, InfectionState::Latent].into_iter().collect();
        let b: InfectionTally = [InfectionState::Recovered].into_iter().collect();
        let total: InfectionTally = [a, b].into_iter().sum();
        assert_eq!(total.get(InfectionState::Latent), 2);
        assert_eq!(total.get(InfectionState::Recovered), 1);
        assert_eq!(total.total(), 3);
    }

    #[test]
    fn display_lists_every_state() {
        let t: InfectionTally = [InfectionState::Latent].into_iter().collect();
        assert_eq!(
            t.to_string(),
            "uninfected=0 latent=1 incubating=0 infectious=0 asymptomatic=0 recovered=0"
        );
    }
}

// ── Roster loader ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::{Cursor, Write};

    use super::*;
    use crate::{load_roster_csv, load_roster_reader};

    const ROSTER: &str = "\
location,pid,susceptibility,vaccinated,infection_state
L0,1,0.8,0,0
L0,2,0.5,1,uninfected
L1,3,0.9,true,infectious
";

    #[test]
    fn parses_rows_in_order() {
        let entries = load_roster_reader(Cursor::new(ROSTER)).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].location, "L0");
        assert_eq!(entries[1].person.id(), PersonId(2));
        assert!(entries[1].person.vaccinated);
        assert_eq!(entries[2].location, "L1");
        assert_eq!(entries[2].person.infection_state, InfectionState::Infectious);
        assert_eq!(entries[2].person.arrival, Tick::ZERO);
    }

    #[test]
    fn bad_state_is_a_parse_error() {
        let csv = "location,pid,susceptibility,vaccinated,infection_state\nL0,1,0.5,0,9\n";
        let err = load_roster_reader(Cursor::new(csv)).unwrap_err();
        assert!(err.to_string().contains("roster row 1"), "{err}");
    }

    #[test]
    fn bad_flag_is_a_parse_error() {
        let csv = "location,pid,susceptibility,vaccinated,infection_state\nL0,1,0.5,maybe,0\n";
        assert!(load_roster_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ROSTER.as_bytes()).unwrap();
        let entries = load_roster_csv(file.path()).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_roster_csv(std::path::Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, epi_core::EpiError::Io(_)));
    }
}
