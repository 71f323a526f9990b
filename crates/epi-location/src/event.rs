//! Timestamped events exchanged between locations and the scheduler.

use std::fmt;

use epi_core::{LocationId, Tick};
use epi_population::Person;

/// What an event asks its receiver to do, with the kind-specific payload.
#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    /// Advance infection states of the receiver's residents.
    DiseaseUpdateTrigger,
    /// Consider moving one resident to a neighbor.
    DiffusionTrigger,
    /// A person migrating into the receiver.  The payload carries the full
    /// person state as it left the sender.
    Arrival(Person),
}

/// Payload-free discriminant of [`EventKind`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum EventTag {
    DiseaseUpdateTrigger,
    DiffusionTrigger,
    Arrival,
}

impl EventKind {
    pub fn tag(&self) -> EventTag {
        match self {
            EventKind::DiseaseUpdateTrigger => EventTag::DiseaseUpdateTrigger,
            EventKind::DiffusionTrigger     => EventTag::DiffusionTrigger,
            EventKind::Arrival(_)           => EventTag::Arrival,
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventTag::DiseaseUpdateTrigger => "disease-update",
            EventTag::DiffusionTrigger     => "diffusion",
            EventTag::Arrival              => "arrival",
        })
    }
}

/// An event addressed to one location at one timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct EpidemicEvent {
    pub receiver:  LocationId,
    pub timestamp: Tick,
    pub kind:      EventKind,
}

impl EpidemicEvent {
    pub fn disease_update(receiver: LocationId, timestamp: Tick) -> Self {
        Self { receiver, timestamp, kind: EventKind::DiseaseUpdateTrigger }
    }

    pub fn diffusion(receiver: LocationId, timestamp: Tick) -> Self {
        Self { receiver, timestamp, kind: EventKind::DiffusionTrigger }
    }

    pub fn arrival(receiver: LocationId, timestamp: Tick, person: Person) -> Self {
        Self { receiver, timestamp, kind: EventKind::Arrival(person) }
    }

    #[inline]
    pub fn tag(&self) -> EventTag {
        self.kind.tag()
    }
}
