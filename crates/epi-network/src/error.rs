//! Network-subsystem error type.

use thiserror::Error;

use epi_core::LocationId;

/// Errors produced by `epi-network`.
///
/// Everything except [`NetworkError::NotANeighbor`] is a construction-time
/// error and aborts the run.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("small-world network needs at least {required} nodes (k + 1), got {nodes}")]
    TooFewNodes { nodes: usize, required: usize },

    #[error("too many nodes for a LocationId: {0}")]
    TooManyNodes(usize),

    #[error("rewiring probability must lie in [0, 1], got {0}")]
    InvalidBeta(f64),

    #[error("location name {0:?} appears more than once")]
    DuplicateNode(String),

    #[error("invalid fetch request: unknown location {0:?}")]
    UnknownLocation(String),

    #[error("location {0} is outside the node set")]
    LocationOutOfRange(LocationId),

    #[error("links requested before the network was mapped")]
    NotMapped,

    #[error("network has already been mapped")]
    AlreadyMapped,

    #[error("location {0} is not a neighbor")]
    NotANeighbor(LocationId),

    #[error("no travel time for neighbor {0}")]
    MissingTravelTime(LocationId),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
