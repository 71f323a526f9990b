//! The `Population` container — residents of one location.

use rustc_hash::FxHashMap;

use epi_core::PersonId;

use crate::{InfectionTally, Person, PopulationError, PopulationResult};

/// Residents of one location, indexable by position and by id.
///
/// Residents live in a dense `Vec` so that "the Nth resident" is an O(1),
/// unambiguous lookup.  A side `FxHashMap` maps each `PersonId` to its slot
/// and is kept in sync by every mutation, which also enforces id uniqueness.
///
/// Removal uses `swap_remove`: the last resident moves into the vacated slot.
#[derive(Clone, Debug, Default)]
pub struct Population {
    persons: Vec<Person>,
    slots:   FxHashMap<PersonId, usize>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an initial roster.  Fails on the first duplicate id.
    pub fn from_persons<I>(persons: I) -> PopulationResult<Self>
    where
        I: IntoIterator<Item = Person>,
    {
        let mut population = Self::new();
        for person in persons {
            population.insert(person)?;
        }
        Ok(population)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: PersonId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Resident at position `index` in the current ordering.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Person> {
        self.persons.get(index)
    }

    pub fn get_by_id(&self, id: PersonId) -> Option<&Person> {
        self.slots.get(&id).map(|&slot| &self.persons[slot])
    }

    pub fn get_by_id_mut(&mut self, id: PersonId) -> Option<&mut Person> {
        let slot = *self.slots.get(&id)?;
        Some(&mut self.persons[slot])
    }

    /// Residents in container order.
    pub fn iter(&self) -> std::slice::Iter<'_, Person> {
        self.persons.iter()
    }

    /// Mutable access to every resident.  Ids cannot be changed through a
    /// `&mut Person`, so the slot index stays valid.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Person> {
        self.persons.iter_mut()
    }

    pub fn as_slice(&self) -> &[Person] {
        &self.persons
    }

    /// Per-state head counts.
    pub fn tally(&self) -> InfectionTally {
        self.persons.iter().map(|p| p.infection_state).collect()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Append `person`.
    ///
    /// # Errors
    ///
    /// [`PopulationError::DuplicatePerson`] if a resident with the same id is
    /// already present.  The population is left untouched.
    pub fn insert(&mut self, person: Person) -> PopulationResult<()> {
        let id = person.id();
        if self.slots.contains_key(&id) {
            return Err(PopulationError::DuplicatePerson(id));
        }
        self.slots.insert(id, self.persons.len());
        self.persons.push(person);
        Ok(())
    }

    /// Remove and return the resident at `index`.
    pub fn remove_at(&mut self, index: usize) -> PopulationResult<Person> {
        if index >= self.persons.len() {
            return Err(PopulationError::IndexOutOfRange { index, len: self.persons.len() });
        }
        let person = self.persons.swap_remove(index);
        self.slots.remove(&person.id());
        // The former last resident now occupies `index`.
        if let Some(moved) = self.persons.get(index) {
            self.slots.insert(moved.id(), index);
        }
        Ok(person)
    }

    /// Remove and return the resident with `id`.
    pub fn remove(&mut self, id: PersonId) -> PopulationResult<Person> {
        let slot = *self.slots.get(&id).ok_or(PopulationError::NotFound(id))?;
        self.remove_at(slot)
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Person;
    type IntoIter = std::slice::Iter<'a, Person>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
