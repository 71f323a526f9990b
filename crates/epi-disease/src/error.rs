use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiseaseError {
    #[error("disease configuration error: {0}")]
    Config(String),
}

pub type DiseaseResult<T> = Result<T, DiseaseError>;
