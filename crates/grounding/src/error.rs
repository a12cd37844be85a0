//! Grounding error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroundingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("grounding service error: {0}")]
    Service(String),
}

pub type Result<T> = std::result::Result<T, GroundingError>;
