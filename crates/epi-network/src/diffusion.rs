//! One location's view of the contact network.

use epi_core::{LocationId, LocationRng};

use crate::{NetworkError, NetworkResult, SmallWorldNetwork, TravelTimes};

/// Neighbor list plus precomputed travel times for a single location.
///
/// Random choices draw from the owning location's [`LocationRng`], passed in
/// by the caller, so they are rewound together with the rest of the
/// location's state.
#[derive(Clone, Debug, Default)]
pub struct DiffusionNetwork {
    neighbors: Vec<LocationId>,
    travel:    TravelTimes,
}

impl DiffusionNetwork {
    /// # Errors
    ///
    /// [`NetworkError::MissingTravelTime`] if some neighbor has no entry in
    /// `travel`.
    pub fn new(neighbors: Vec<LocationId>, travel: TravelTimes) -> NetworkResult<Self> {
        if let Some(&missing) = neighbors.iter().find(|&&n| travel.get(n).is_none()) {
            return Err(NetworkError::MissingTravelTime(missing));
        }
        Ok(Self { neighbors, travel })
    }

    /// A view with no neighbors: every diffusion cycle is skipped.
    pub fn isolated() -> Self {
        Self::default()
    }

    /// Build the view for `location` from a mapped network and the
    /// per-location travel-time-to-hub metric.
    pub fn from_network(
        network:   &SmallWorldNetwork,
        location:  LocationId,
        hub_times: &[u64],
    ) -> NetworkResult<Self> {
        let neighbors = network.node_links(location)?;
        let travel = TravelTimes::from_hub_times(&neighbors, hub_times)?;
        Self::new(neighbors, travel)
    }

    /// A uniformly chosen neighbor, or `None` for an isolated location.
    /// Nothing is drawn from `rng` when there is no neighbor.
    pub fn pick_location(&self, rng: &mut LocationRng) -> Option<LocationId> {
        if self.neighbors.is_empty() {
            return None;
        }
        Some(self.neighbors[rng.index(self.neighbors.len())])
    }

    /// Travel duration to neighbor `to`.
    ///
    /// # Errors
    ///
    /// [`NetworkError::NotANeighbor`] if `to` is not a neighbor.
    pub fn travel_time_to_location(&self, to: LocationId) -> NetworkResult<u64> {
        self.travel.get(to).ok_or(NetworkError::NotANeighbor(to))
    }

    /// Uniform resident index in `[0, population_size)`.
    ///
    /// The caller guarantees `population_size > 0`.
    pub fn pick_person(&self, rng: &mut LocationRng, population_size: usize) -> usize {
        debug_assert!(population_size > 0, "pick_person on an empty population");
        rng.index(population_size)
    }

    pub fn neighbors(&self) -> &[LocationId] {
        &self.neighbors
    }

    pub fn travel_times(&self) -> &TravelTimes {
        &self.travel
    }

    pub fn is_isolated(&self) -> bool {
        self.neighbors.is_empty()
    }
}
