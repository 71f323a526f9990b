//! `EventQueue` — pending epidemic events in delivery order.
//!
//! # Ordering
//!
//! Events are keyed by [`EventKey`] and delivered in ascending key order:
//!
//! 1. `timestamp`, earliest first;
//! 2. `receiver`, lowest `LocationId` first;
//! 3. `sender`, the location that emitted the event;
//! 4. `seq`, the sender's emission counter.
//!
//! `(sender, seq)` is unique per event, so the order is total and does not
//! depend on insertion order.  Two runs that emit the same events therefore
//! deliver them identically, whatever order the emitting locations ran in.
//!
//! The queue is a `BTreeMap`, cloned wholesale for scheduler checkpoints.
//! Pending counts are small (two triggers per location plus migrants in
//! flight), so the clone is cheap.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use epi_core::{LocationId, Tick};
use epi_location::EpidemicEvent;

/// Delivery-order key of a queued event.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EventKey {
    pub timestamp: Tick,
    pub receiver:  LocationId,
    pub sender:    LocationId,
    pub seq:       u64,
}

impl EventKey {
    /// The smallest key at `timestamp`.
    fn first_at(timestamp: Tick) -> Self {
        EventKey { timestamp, receiver: LocationId(0), sender: LocationId(0), seq: 0 }
    }
}

/// Pending events ordered by [`EventKey`].
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    inner: BTreeMap<EventKey, EpidemicEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event`, emitted by `sender` as its `seq`-th event.
    ///
    /// Returns `false` (and leaves the queue unchanged) if the same
    /// `(sender, seq)` pair is already queued for that receiver and time.
    pub fn push(&mut self, sender: LocationId, seq: u64, event: EpidemicEvent) -> bool {
        let key = EventKey {
            timestamp: event.timestamp,
            receiver:  event.receiver,
            sender,
            seq,
        };
        match self.inner.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(event);
                true
            }
        }
    }

    /// Remove and return every event at the earliest queued timestamp, in key
    /// order.  Returns `None` if the queue is empty.
    pub fn drain_next(&mut self) -> Option<(Tick, Vec<(EventKey, EpidemicEvent)>)> {
        let now = self.next_timestamp()?;
        let later = match now.0.checked_add(1) {
            Some(next) => self.inner.split_off(&EventKey::first_at(Tick(next))),
            None       => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.inner, later);
        Some((now, due.into_iter().collect()))
    }

    /// The earliest queued timestamp, or `None` if empty.
    pub fn next_timestamp(&self) -> Option<Tick> {
        self.inner.keys().next().map(|k| k.timestamp)
    }

    /// Queued events in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = (&EventKey, &EpidemicEvent)> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
