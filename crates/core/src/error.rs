//! Error types for the core domain

use crate::entity::Corpus;
use thiserror::Error;

/// Core domain errors.
///
/// Only conditions that make the run meaningless are errors; malformed
/// annotations, grounding failures, and oversized buckets are recovered
/// locally and surfaced as diagnostics instead.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("corpus {0} contains no entities; nothing to match against")]
    EmptyCorpus(Corpus),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
