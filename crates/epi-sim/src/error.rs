use epi_core::{EpiError, LocationId, PersonId, Tick};
use epi_disease::DiseaseError;
use epi_location::LocationError;
use epi_network::NetworkError;
use epi_population::PopulationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("roster places {person} at unknown location {location:?}")]
    UnknownRosterLocation {
        location: String,
        person:   PersonId,
    },

    #[error("event for unknown location {receiver} emitted by {sender}")]
    UnknownReceiver {
        sender:   LocationId,
        receiver: LocationId,
    },

    #[error("event for {receiver} at {timestamp} lies before the current time {now}")]
    Causality {
        receiver:  LocationId,
        timestamp: Tick,
        now:       Tick,
    },

    #[error("checkpoint covers {got} locations, simulation has {expected}")]
    CheckpointMismatch {
        expected: usize,
        got:      usize,
    },

    #[error("location {location} failed: {source}")]
    Location {
        location: LocationId,
        #[source]
        source:   LocationError,
    },

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("disease model error: {0}")]
    Disease(#[from] DiseaseError),

    #[error("population error: {0}")]
    Population(#[from] PopulationError),

    #[error(transparent)]
    Core(#[from] EpiError),
}

pub type SimResult<T> = Result<T, SimError>;
