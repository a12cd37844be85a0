//! Entity references - one model entity from one source file

use crate::identifier::{Identifier, Provenance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which file format an entity was drawn from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Corpus {
    /// Pathway-diagram files
    Diagram,
    /// Quantitative-model files
    Model,
}

impl std::fmt::Display for Corpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Corpus::Diagram => write!(f, "diagram"),
            Corpus::Model => write!(f, "model"),
        }
    }
}

/// Key uniquely identifying an entity across both corpora
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    pub corpus: Corpus,
    /// Origin file, as named by the external parser
    pub source_file: String,
    /// Entity id unique within its file
    pub local_id: String,
}

impl EntityKey {
    pub fn new(
        corpus: Corpus,
        source_file: impl Into<String>,
        local_id: impl Into<String>,
    ) -> Self {
        Self {
            corpus,
            source_file: source_file.into(),
            local_id: local_id.into(),
        }
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.corpus, self.source_file, self.local_id)
    }
}

/// One model entity from one source file, with its extracted identifier set.
///
/// Immutable once extraction (and optional grounding) is done; clustering
/// references entities by key and never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRef {
    pub corpus: Corpus,
    pub source_file: String,
    pub local_id: String,

    /// Display name, when the source file carries one
    #[serde(default)]
    pub label: Option<String>,

    /// Deduplicated `(namespace, accession)` pairs with their provenance.
    /// A BTreeMap keeps iteration deterministic for downstream id derivation.
    #[serde(default, with = "identifier_entries")]
    pub identifiers: BTreeMap<Identifier, Provenance>,
}

/// Identifier maps (de)serialize as entry lists; JSON objects cannot key
/// on a struct.
mod identifier_entries {
    use super::*;
    use serde::{Deserializer, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Entry {
        #[serde(flatten)]
        identifier: Identifier,
        provenance: Provenance,
    }

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<Identifier, Provenance>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.iter().map(|(identifier, provenance)| Entry {
            identifier: identifier.clone(),
            provenance: *provenance,
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Identifier, Provenance>, D::Error> {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|entry| (entry.identifier, entry.provenance))
            .collect())
    }
}

impl EntityRef {
    /// Create an entity with an empty identifier set
    pub fn new(
        corpus: Corpus,
        source_file: impl Into<String>,
        local_id: impl Into<String>,
    ) -> Self {
        Self {
            corpus,
            source_file: source_file.into(),
            local_id: local_id.into(),
            label: None,
            identifiers: BTreeMap::new(),
        }
    }

    /// Builder: set label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.corpus, self.source_file.clone(), self.local_id.clone())
    }

    /// Add an identifier. Set semantics over pairs: re-adding the same pair
    /// is a no-op, except that explicit provenance always wins over grounded.
    pub fn add_identifier(&mut self, identifier: Identifier, provenance: Provenance) {
        match self.identifiers.get_mut(&identifier) {
            Some(existing) => {
                if provenance == Provenance::Explicit {
                    *existing = Provenance::Explicit;
                }
            }
            None => {
                self.identifiers.insert(identifier, provenance);
            }
        }
    }

    pub fn has_identifier(&self, identifier: &Identifier) -> bool {
        self.identifiers.contains_key(identifier)
    }

    /// True if no explicit annotation survived extraction
    pub fn has_no_explicit_identifiers(&self) -> bool {
        !self
            .identifiers
            .values()
            .any(|p| *p == Provenance::Explicit)
    }

    pub fn identifier_count(&self) -> usize {
        self.identifiers.len()
    }
}
