use thiserror::Error;

use epi_core::PersonId;

#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("person {0} is already a resident")]
    DuplicatePerson(PersonId),

    #[error("person {0} is not a resident")]
    NotFound(PersonId),

    #[error("resident index {index} out of range for population of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown infection state {0:?}")]
    UnknownState(String),
}

pub type PopulationResult<T> = Result<T, PopulationError>;
