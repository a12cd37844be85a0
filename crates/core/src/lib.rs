//! Core domain types for biokg
//!
//! This crate defines the fundamental data structures used throughout
//! the matching pipeline: entities, ontology identifiers, match pairs,
//! clusters, and the assembled knowledge graph.

pub mod config;
pub mod entity;
pub mod error;
pub mod graph;
pub mod identifier;
pub mod input;
pub mod matching;

pub use config::{GroundingPolicy, MatchConfig};
pub use entity::{Corpus, EntityKey, EntityRef};
pub use error::{CoreError, Result};
pub use graph::{GraphEdge, GraphNode, KnowledgeGraph, MemberRef, NodeKind};
pub use identifier::{
    parse_resource_uri, GroundingCandidate, Identifier, MalformReason, ParsedResource, Provenance,
};
pub use input::{ParsedEntity, ParsedFile};
pub use matching::{CorpusPairKind, EntityCluster, MatchPair, NamespaceConflict};
