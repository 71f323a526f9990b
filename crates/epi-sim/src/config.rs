//! JSON run configuration.
//!
//! # Format
//!
//! ```json
//! {
//!   "seed": 42,
//!   "end_time": 500,
//!   "refresh_interval": 10,
//!   "network": { "k": 4, "beta": 0.1, "rewire": "redirect" },
//!   "disease": { "transmissibility": 0.25 },
//!   "locations": [
//!     { "name": "L0", "travel_time_to_hub": 12, "diffusion_interval": 20 },
//!     { "name": "L1", "travel_time_to_hub": 7,  "diffusion_interval": 20 }
//!   ]
//! }
//! ```
//!
//! `network` and `disease` may be omitted, as may any field inside
//! `disease`; missing values take their defaults.  The order of `locations`
//! fixes each location's `LocationId` and ring position.

use std::io::Read;
use std::path::Path;

use log::debug;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use epi_core::{EpiError, EpiResult};
use epi_disease::DwellTimeParams;
use epi_network::RewireMode;

use crate::{SimError, SimResult};

// ── Sections ──────────────────────────────────────────────────────────────────

/// Small-world generator parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Ring-lattice degree.
    pub k:      usize,
    /// Rewiring probability in `[0, 1]`.
    pub beta:   f64,
    #[serde(default)]
    pub rewire: RewireMode,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { k: 4, beta: 0.1, rewire: RewireMode::default() }
    }
}

/// One location of the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub name:               String,
    /// Ticks needed to reach this location from any of its neighbors.
    pub travel_time_to_hub: u64,
    /// Ticks between two diffusion triggers.
    pub diffusion_interval: u64,
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Everything needed to bootstrap a [`Sim`][crate::Sim] apart from the
/// population roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Global RNG seed.  Drives network construction and every location's
    /// stream.
    pub seed:             u64,
    /// [`Sim::run`][crate::Sim::run] stops before the first wave at or after
    /// this tick.
    pub end_time:         u64,
    /// Ticks between two disease updates, shared by every location.
    pub refresh_interval: u64,
    #[serde(default)]
    pub network:          NetworkConfig,
    #[serde(default)]
    pub disease:          DwellTimeParams,
    pub locations:        Vec<LocationConfig>,
}

impl SimConfig {
    /// Check the values that the network and disease constructors do not
    /// check themselves.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] for an empty location list, a zero interval, a
    /// repeated location name, or an interval or travel time so large that
    /// an event handled before `end_time` would be scheduled past `u64::MAX`.
    pub fn validate(&self) -> SimResult<()> {
        if self.locations.is_empty() {
            return Err(SimError::Config("no locations configured".into()));
        }
        if self.refresh_interval == 0 {
            return Err(SimError::Config("refresh_interval must be > 0".into()));
        }
        self.check_horizon("refresh_interval", self.refresh_interval)?;
        let mut seen = FxHashSet::default();
        for loc in &self.locations {
            if loc.diffusion_interval == 0 {
                return Err(SimError::Config(format!(
                    "location {:?}: diffusion_interval must be > 0",
                    loc.name,
                )));
            }
            self.check_horizon("diffusion_interval", loc.diffusion_interval)?;
            self.check_horizon("travel_time_to_hub", loc.travel_time_to_hub)?;
            if !seen.insert(loc.name.as_str()) {
                return Err(SimError::Config(format!("duplicate location name {:?}", loc.name)));
            }
        }
        Ok(())
    }

    fn check_horizon(&self, what: &str, delay: u64) -> SimResult<()> {
        match self.end_time.checked_add(delay) {
            Some(_) => Ok(()),
            None => Err(SimError::Config(format!(
                "{what} {delay} overflows the timeline with end_time {}",
                self.end_time,
            ))),
        }
    }

    /// Per-location travel time to hub, indexed by `LocationId`.
    pub fn hub_times(&self) -> Vec<u64> {
        self.locations.iter().map(|l| l.travel_time_to_hub).collect()
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load a [`SimConfig`] from a JSON file.
pub fn load_config_json(path: &Path) -> EpiResult<SimConfig> {
    let file = std::fs::File::open(path)?;
    let config = load_config_reader(std::io::BufReader::new(file))
        .map_err(|e| match e {
            EpiError::Parse(msg) => EpiError::Parse(format!("{}: {msg}", path.display())),
            other => other,
        })?;
    debug!("loaded configuration from {}", path.display());
    Ok(config)
}

/// Like [`load_config_json`] but accepts any `Read` source.
pub fn load_config_reader<R: Read>(reader: R) -> EpiResult<SimConfig> {
    serde_json::from_reader(reader).map_err(|e| EpiError::Parse(e.to_string()))
}
