//! Text grounding for biokg
//!
//! This crate contains the client for the external grounding service
//! (free-text labels to candidate ontology identifiers) and the
//! enricher that applies grounding to extracted entities.

pub mod client;
pub mod enrich;
pub mod error;

pub use client::GroundingClient;
pub use enrich::{EnrichmentReport, GroundingEnricher};
pub use error::{GroundingError, Result};
