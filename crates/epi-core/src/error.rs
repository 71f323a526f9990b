//! Workspace base error type.
//!
//! Sub-crates define their own error enums and wrap `EpiError` as one
//! variant where they need the shared cases.

use thiserror::Error;

/// The base error type shared by the `epi-*` crates.
#[derive(Debug, Error)]
pub enum EpiError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type.
pub type EpiResult<T> = Result<T, EpiError>;
