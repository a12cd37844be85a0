//! Identifier extraction - raw annotation payloads to entity references

use biokg_core::{
    parse_resource_uri, Corpus, EntityRef, GroundingCandidate, MalformReason, MatchConfig,
    ParsedEntity, ParsedFile, ParsedResource, Provenance,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A resource string that did not match the expected
/// `scheme://host/namespace/accession` shape. Recovered locally; the
/// entity keeps its remaining valid identifiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MalformedAnnotation {
    pub source_file: String,
    pub local_id: String,
    pub raw: String,
    pub reason: MalformReason,
}

/// Output of extracting one corpus: the entity set plus the diagnostics
/// accumulated along the way.
#[derive(Debug, Clone, Default)]
pub struct ExtractedCorpus {
    pub entities: Vec<EntityRef>,
    pub malformed: Vec<MalformedAnnotation>,
}

impl ExtractedCorpus {
    pub fn identifier_incidences(&self) -> usize {
        self.entities.iter().map(EntityRef::identifier_count).sum()
    }

    fn merge(mut self, other: ExtractedCorpus) -> ExtractedCorpus {
        self.entities.extend(other.entities);
        self.malformed.extend(other.malformed);
        self
    }
}

/// Normalizes raw annotation blocks into structured identifier sets,
/// one `EntityRef` per parsed entity.
#[derive(Debug, Clone)]
pub struct Extractor {
    confidence_floor: f32,
}

impl Extractor {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            confidence_floor: config.confidence_floor,
        }
    }

    /// Extract every file of a corpus. Files are independent, so the work
    /// is parallel per source file with no shared mutable state.
    pub fn extract_corpus(&self, files: &[ParsedFile]) -> ExtractedCorpus {
        let extracted = files
            .par_iter()
            .map(|file| self.extract_file(file))
            .reduce(ExtractedCorpus::default, ExtractedCorpus::merge);

        debug!(
            "Extracted {} entities ({} identifier incidences, {} malformed annotations)",
            extracted.entities.len(),
            extracted.identifier_incidences(),
            extracted.malformed.len()
        );

        extracted
    }

    /// Extract all entities of one parsed file
    pub fn extract_file(&self, file: &ParsedFile) -> ExtractedCorpus {
        let mut out = ExtractedCorpus::default();
        for parsed in &file.entities {
            let (entity, malformed) =
                self.extract_entity(file.corpus, &file.source_file, parsed);
            out.entities.push(entity);
            out.malformed.extend(malformed);
        }
        debug!(
            "{}: {} entities, {} identifiers",
            file.source_file,
            out.entities.len(),
            out.identifier_incidences()
        );
        out
    }

    /// Extract one entity. Entities with zero valid identifiers are
    /// retained; they may still be grounded from their label later.
    pub fn extract_entity(
        &self,
        corpus: Corpus,
        source_file: &str,
        parsed: &ParsedEntity,
    ) -> (EntityRef, Vec<MalformedAnnotation>) {
        let mut entity = EntityRef::new(corpus, source_file, parsed.local_id.clone());
        if let Some(label) = &parsed.label {
            entity = entity.with_label(label.clone());
        }

        let mut malformed = Vec::new();
        for raw in &parsed.annotations {
            match parse_resource_uri(raw) {
                ParsedResource::Valid(identifier) => {
                    entity.add_identifier(identifier, Provenance::Explicit);
                }
                ParsedResource::Malformed { raw, reason } => {
                    warn!(
                        "{}#{}: dropping malformed annotation `{}` ({})",
                        source_file, parsed.local_id, raw, reason
                    );
                    malformed.push(MalformedAnnotation {
                        source_file: source_file.to_string(),
                        local_id: parsed.local_id.clone(),
                        raw,
                        reason,
                    });
                }
            }
        }

        (entity, malformed)
    }

    /// Merge grounding candidates into an entity's identifier set,
    /// keeping only candidates at or above the configured floor.
    pub fn apply_grounding(&self, entity: &mut EntityRef, candidates: &[GroundingCandidate]) {
        let mut accepted = 0usize;
        for candidate in candidates {
            if candidate.confidence >= self.confidence_floor {
                entity.add_identifier(candidate.identifier(), Provenance::Grounded);
                accepted += 1;
            }
        }
        if accepted > 0 {
            debug!(
                "{}: accepted {} grounded identifier(s) of {} candidate(s)",
                entity.key(),
                accepted,
                candidates.len()
            );
        }
    }
}
