//! Per-location travel-time tables.

use std::collections::BTreeMap;

use epi_core::LocationId;

use crate::{NetworkError, NetworkResult};

/// Neighbor → travel duration (ticks) for one location.  Immutable once the
/// simulation starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TravelTimes {
    entries: BTreeMap<LocationId, u64>,
}

impl TravelTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the table for a location from its neighbor list and the
    /// per-location travel-time-to-hub metric (`hub_times`, indexed by
    /// `LocationId`).  Travelling to neighbor `n` takes `hub_times[n]`.
    ///
    /// # Errors
    ///
    /// [`NetworkError::MissingTravelTime`] if a neighbor has no hub time.
    pub fn from_hub_times(neighbors: &[LocationId], hub_times: &[u64]) -> NetworkResult<Self> {
        let mut table = Self::new();
        for &n in neighbors {
            let time = *hub_times
                .get(n.index())
                .ok_or(NetworkError::MissingTravelTime(n))?;
            table.insert(n, time);
        }
        Ok(table)
    }

    pub fn insert(&mut self, neighbor: LocationId, ticks: u64) {
        self.entries.insert(neighbor, ticks);
    }

    #[inline]
    pub fn get(&self, neighbor: LocationId) -> Option<u64> {
        self.entries.get(&neighbor).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(neighbor, ticks)` in ascending `LocationId` order.
    pub fn iter(&self) -> impl Iterator<Item = (LocationId, u64)> + '_ {
        self.entries.iter().map(|(&id, &t)| (id, t))
    }
}

impl FromIterator<(LocationId, u64)> for TravelTimes {
    fn from_iter<I: IntoIterator<Item = (LocationId, u64)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}
