use epi_core::{LocationId, Tick};
use epi_network::NetworkError;
use epi_population::PopulationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location {location:?}: {what} must be > 0")]
    ZeroInterval {
        location: String,
        what:     &'static str,
    },

    #[error("event for {receiver} delivered to {location}")]
    Misrouted {
        location: LocationId,
        receiver: LocationId,
    },

    #[error("location {location}: {delay} ticks after {now} is past the end of time")]
    TimeOverflow {
        location: LocationId,
        now:      Tick,
        delay:    u64,
    },

    #[error("diffusion network error: {0}")]
    Network(#[from] NetworkError),

    #[error("population error: {0}")]
    Population(#[from] PopulationError),
}

pub type LocationResult<T> = Result<T, LocationError>;
