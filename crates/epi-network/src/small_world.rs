//! Small-world network generator.
//!
//! # Algorithm
//!
//! 1. **Ring lattice.**  Nodes sit on a ring in the order they were
//!    populated.  Node `i` is linked to the `k / 2` nodes before it and the
//!    `k - k / 2` nodes after it (indices mod `n`).  Every link is set in
//!    both directions.
//! 2. **Rewiring.**  Nodes are visited in index order and, for each node,
//!    every other node in index order.  Each *currently present* link
//!    consumes one draw from `[0, BETA_PRECISION)`; a draw below
//!    `beta * BETA_PRECISION` (truncated to an integer) rewires it to a uniformly chosen new target
//!    (rejecting the node itself and the old neighbor).  Comparing integers
//!    avoids floating-point drift between platforms.
//!
//! The rewiring scan reads the live matrix, so a link removed earlier in the
//! scan is not visited again and a link added earlier is.  For a fixed node
//! order, `k`, `beta`, mode, and RNG seed the result is exactly reproducible.
//!
//! # Data layout
//!
//! A dense row-major `n × n` boolean matrix.  Location counts are small
//! (hundreds), and the dense form makes the symmetric update and the
//! index-ordered scan trivial.

use log::{debug, trace};
use rustc_hash::FxHashMap;

use epi_core::{LocationId, SimRng};

use crate::{NetworkError, NetworkResult};

/// Resolution of the rewiring probability.
pub const BETA_PRECISION: u32 = 10_000;

// ── RewireMode ────────────────────────────────────────────────────────────────

/// What happens to a link selected for rewiring.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RewireMode {
    /// Clear the old link and any link to the new target; add nothing.
    /// Every rewire loses at least one link, and the graph thins out as
    /// `beta` grows.
    Faithful,

    /// Clear the old link and link the node to the new target instead.
    /// If the target was already a neighbor the two links merge.
    #[default]
    Redirect,
}

// ── RewireStats ───────────────────────────────────────────────────────────────

/// What the rewiring pass did.
///
/// Edge accounting after mapping, from a lattice of `L` edges:
/// - `Redirect`: `L - merged` edges.
/// - `Faithful`: `L - rewired - merged` edges.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct RewireStats {
    /// Links selected by the threshold draw and moved to a new target.
    pub rewired: usize,
    /// Rewires whose new target was already a neighbor.
    pub merged:  usize,
}

// ── SmallWorldNetwork ─────────────────────────────────────────────────────────

/// Ring lattice with probabilistic rewiring over a fixed list of named
/// locations.
///
/// # Example
///
/// ```
/// use epi_core::SimRng;
/// use epi_network::SmallWorldNetwork;
///
/// let mut net = SmallWorldNetwork::new(2, 0.0).unwrap();
/// net.populate_nodes(["A", "B", "C", "D"]).unwrap();
/// net.map_nodes(&mut SimRng::new(1)).unwrap();
/// assert_eq!(net.fetch_node_links("A").unwrap(), vec!["B", "D"]);
/// ```
#[derive(Clone, Debug)]
pub struct SmallWorldNetwork {
    k:      usize,
    beta:   f64,
    mode:   RewireMode,
    nodes:  Vec<String>,
    index:  FxHashMap<String, LocationId>,
    links:  Vec<bool>,
    stats:  RewireStats,
    mapped: bool,
}

impl SmallWorldNetwork {
    /// Create a generator for node degree `k` and rewiring probability `beta`.
    ///
    /// # Errors
    ///
    /// [`NetworkError::InvalidBeta`] unless `0 <= beta <= 1`.
    pub fn new(k: usize, beta: f64) -> NetworkResult<Self> {
        if !(0.0..=1.0).contains(&beta) {
            return Err(NetworkError::InvalidBeta(beta));
        }
        Ok(Self {
            k,
            beta,
            mode:   RewireMode::default(),
            nodes:  Vec::new(),
            index:  FxHashMap::default(),
            links:  Vec::new(),
            stats:  RewireStats::default(),
            mapped: false,
        })
    }

    /// Select the rewiring semantics (default [`RewireMode::Redirect`]).
    pub fn with_mode(mut self, mode: RewireMode) -> Self {
        self.mode = mode;
        self
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Register the node set and allocate an empty adjacency matrix.
    ///
    /// The iteration order of `names` fixes each node's ring position and
    /// its `LocationId`.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::TooFewNodes`] if fewer than `k + 1` names are given.
    /// - [`NetworkError::DuplicateNode`] if a name repeats.
    pub fn populate_nodes<I, S>(&mut self, names: I) -> NetworkResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let nodes: Vec<String> = names.into_iter().map(Into::into).collect();
        if nodes.len() <= self.k {
            return Err(NetworkError::TooFewNodes {
                nodes:    nodes.len(),
                required: self.k.saturating_add(1),
            });
        }

        let mut index = FxHashMap::default();
        for (i, name) in nodes.iter().enumerate() {
            let id = LocationId::try_from(i)
                .map_err(|_| NetworkError::TooManyNodes(nodes.len()))?;
            if index.insert(name.clone(), id).is_some() {
                return Err(NetworkError::DuplicateNode(name.clone()));
            }
        }

        self.links = vec![false; nodes.len() * nodes.len()];
        self.nodes = nodes;
        self.index = index;
        self.stats = RewireStats::default();
        self.mapped = false;
        Ok(())
    }

    /// Build the ring lattice, then rewire it.  Both phases run here, in
    /// order, and the network is immutable afterwards.
    ///
    /// # Errors
    ///
    /// [`NetworkError::AlreadyMapped`] on a second call.
    pub fn map_nodes(&mut self, rng: &mut SimRng) -> NetworkResult<()> {
        if self.mapped {
            return Err(NetworkError::AlreadyMapped);
        }
        self.build_ring_lattice();
        let lattice_edges = self.edge_count();
        self.stats = self.rewire(rng);
        self.mapped = true;

        debug!(
            "small-world network: {} nodes, k={}, beta={}, {:?}: {} lattice edges, {} rewired ({} merged), {} final",
            self.nodes.len(),
            self.k,
            self.beta,
            self.mode,
            lattice_edges,
            self.stats.rewired,
            self.stats.merged,
            self.edge_count(),
        );
        Ok(())
    }

    fn build_ring_lattice(&mut self) {
        let n = self.nodes.len();
        let left = self.k / 2;
        let right = self.k - left;

        for i in 0..n {
            for step in 1..=left {
                self.link(i, (i + n - step) % n);
            }
            for step in 1..=right {
                self.link(i, (i + step) % n);
            }
        }
    }

    fn rewire(&mut self, rng: &mut SimRng) -> RewireStats {
        let n = self.nodes.len();
        let threshold = (self.beta * BETA_PRECISION as f64) as u32;
        let mut stats = RewireStats::default();

        for i in 0..n {
            for j in 0..n {
                if !self.is_linked_at(i, j) {
                    continue;
                }
                let draw: u32 = rng.gen_range(0..BETA_PRECISION);
                if draw >= threshold {
                    continue;
                }
                // With fewer than three nodes there is no node other than
                // `i` and `j` to rewire to.
                if n < 3 {
                    continue;
                }
                let target = loop {
                    let t = rng.gen_range(0..n);
                    if t != i && t != j {
                        break t;
                    }
                };

                if self.is_linked_at(i, target) {
                    stats.merged += 1;
                }
                self.unlink(i, j);
                match self.mode {
                    RewireMode::Faithful => self.unlink(i, target),
                    RewireMode::Redirect => self.link(i, target),
                }
                stats.rewired += 1;
                trace!(
                    "rewire {} -> {} becomes {} -> {} ({:?})",
                    self.nodes[i], self.nodes[j], self.nodes[i], self.nodes[target], self.mode,
                );
            }
        }
        stats
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Names of the neighbors of `name`, in node order.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::UnknownLocation`] if `name` is not a node.  This is
    ///   a fatal configuration error for the run.
    /// - [`NetworkError::NotMapped`] before [`map_nodes`](Self::map_nodes).
    pub fn fetch_node_links(&self, name: &str) -> NetworkResult<Vec<&str>> {
        let id = self
            .index_of(name)
            .ok_or_else(|| NetworkError::UnknownLocation(name.to_string()))?;
        Ok(self
            .node_links(id)?
            .into_iter()
            .map(|n| self.nodes[n.index()].as_str())
            .collect())
    }

    /// Neighbor ids of `id`, in node order.
    pub fn node_links(&self, id: LocationId) -> NetworkResult<Vec<LocationId>> {
        if !self.mapped {
            return Err(NetworkError::NotMapped);
        }
        let i = self.checked_index(id)?;
        Ok((0..self.nodes.len())
            .filter(|&j| self.is_linked_at(i, j))
            .map(|j| LocationId(j as u32))
            .collect())
    }

    pub fn index_of(&self, name: &str) -> Option<LocationId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: LocationId) -> Option<&str> {
        self.nodes.get(id.index()).map(String::as_str)
    }

    /// Node names in ring order (index = `LocationId`).
    pub fn names(&self) -> &[String] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected links.
    /// Counts from the rewiring pass (all zero before mapping).
    pub fn rewire_stats(&self) -> RewireStats {
        self.stats
    }

    pub fn edge_count(&self) -> usize {
        self.links.iter().filter(|&&l| l).count() / 2
    }

    /// Undirected links as `(a, b)` pairs with `a < b`, in index order.
    pub fn edges(&self) -> Vec<(LocationId, LocationId)> {
        let n = self.nodes.len();
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.is_linked_at(i, j) {
                    edges.push((LocationId(i as u32), LocationId(j as u32)));
                }
            }
        }
        edges
    }

    pub fn degree(&self, id: LocationId) -> NetworkResult<usize> {
        let i = self.checked_index(id)?;
        let n = self.nodes.len();
        Ok(self.links[i * n..(i + 1) * n].iter().filter(|&&l| l).count())
    }

    /// `true` if `a` and `b` are linked.  Out-of-range ids are never linked.
    pub fn is_linked(&self, a: LocationId, b: LocationId) -> bool {
        let n = self.nodes.len();
        a.index() < n && b.index() < n && self.is_linked_at(a.index(), b.index())
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn mode(&self) -> RewireMode {
        self.mode
    }

    // ── Matrix helpers ────────────────────────────────────────────────────

    #[inline]
    fn is_linked_at(&self, i: usize, j: usize) -> bool {
        self.links[i * self.nodes.len() + j]
    }

    /// Set the link in both directions.  Self-links are ignored.
    #[inline]
    fn link(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let n = self.nodes.len();
        self.links[i * n + j] = true;
        self.links[j * n + i] = true;
    }

    #[inline]
    fn unlink(&mut self, i: usize, j: usize) {
        let n = self.nodes.len();
        self.links[i * n + j] = false;
        self.links[j * n + i] = false;
    }

    fn checked_index(&self, id: LocationId) -> NetworkResult<usize> {
        if id.index() < self.nodes.len() {
            Ok(id.index())
        } else {
            Err(NetworkError::LocationOutOfRange(id))
        }
    }
}
