//! Match pairs and entity-resolution clusters

use crate::entity::{Corpus, EntityKey};
use crate::identifier::Identifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Classification of a match pair by the corpora of its endpoints.
///
/// Cross-corpus matching is the primary use case, intra-corpus duplicate
/// detection the secondary one; neither class is ever silently dropped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CorpusPairKind {
    /// One diagram entity, one model entity
    Cross,
    /// Two diagram entities
    IntraDiagram,
    /// Two model entities
    IntraModel,
}

impl CorpusPairKind {
    pub fn classify(a: Corpus, b: Corpus) -> Self {
        match (a, b) {
            (Corpus::Diagram, Corpus::Diagram) => CorpusPairKind::IntraDiagram,
            (Corpus::Model, Corpus::Model) => CorpusPairKind::IntraModel,
            _ => CorpusPairKind::Cross,
        }
    }

    pub fn is_cross(&self) -> bool {
        matches!(self, CorpusPairKind::Cross)
    }
}

impl std::fmt::Display for CorpusPairKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorpusPairKind::Cross => write!(f, "cross"),
            CorpusPairKind::IntraDiagram => write!(f, "intra_diagram"),
            CorpusPairKind::IntraModel => write!(f, "intra_model"),
        }
    }
}

/// An unordered pair of entities sharing at least one identifier.
///
/// Endpoints are stored in ascending key order so that a pair compares
/// equal regardless of discovery order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchPair {
    pub a: EntityKey,
    pub b: EntityKey,
    /// Non-empty set of identifiers carried by both endpoints
    pub shared: BTreeSet<Identifier>,
    pub kind: CorpusPairKind,
}

impl MatchPair {
    /// Create a pair, normalizing endpoint order
    pub fn new(a: EntityKey, b: EntityKey, shared: BTreeSet<Identifier>) -> Self {
        let kind = CorpusPairKind::classify(a.corpus, b.corpus);
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        Self { a, b, shared, kind }
    }

    pub fn overlap_count(&self) -> usize {
        self.shared.len()
    }

    pub fn touches(&self, key: &EntityKey) -> bool {
        &self.a == key || &self.b == key
    }
}

/// A namespace carrying more than one accession within a single cluster.
///
/// Transitively-chained pairs can pull conflicting annotations into one
/// component; the ambiguity is surfaced, not resolved silently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamespaceConflict {
    pub namespace: String,
    pub accessions: BTreeSet<String>,
}

/// A set of entities resolved to one biological object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityCluster {
    /// Deterministic canonical id derived from the sorted member identifiers
    pub id: String,
    pub members: BTreeSet<EntityKey>,
    /// Union of the members' identifiers
    pub identifiers: BTreeSet<Identifier>,
    /// The match pairs that justified inclusion
    pub edges: Vec<MatchPair>,
    /// Namespaces with conflicting accessions, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<NamespaceConflict>,
}

impl EntityCluster {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_conflicting(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Derive the canonical cluster id from an identifier union:
    /// sorted CURIEs joined with `|`. Order-independent and reproducible.
    pub fn canonical_id(identifiers: &BTreeSet<Identifier>) -> String {
        identifiers
            .iter()
            .map(Identifier::curie)
            .collect::<Vec<_>>()
            .join("|")
    }
}
