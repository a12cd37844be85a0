//! Tabular run report - the externally auditable matching artifact

use crate::aggregate::OversizedBucket;
use crate::extract::MalformedAnnotation;
use biokg_core::{EntityCluster, EntityKey, EntityRef, Identifier, MatchPair};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

/// One row per retained match pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub entity_a: String,
    pub entity_b: String,
    pub corpus_pair: String,
    pub entity_a_identifier_count: usize,
    pub entity_b_identifier_count: usize,
    pub overlap_count: usize,
    /// Sorted shared identifiers, space-joined
    pub shared_identifiers: String,
}

/// Run-level counters for the console summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub diagram_entities: usize,
    pub model_entities: usize,
    pub identifier_incidences: usize,
    pub malformed_annotations: usize,
    pub pairs_total: usize,
    pub pairs_cross: usize,
    pub pairs_intra: usize,
    pub oversized_buckets: usize,
    pub clusters: usize,
    pub conflicting_clusters: usize,
    pub unclustered_entities: usize,
}

/// The full report: summary plus one row per retained match pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub summary: RunSummary,
    pub rows: Vec<ReportRow>,
}

impl RunReport {
    pub fn build(
        entities: &[EntityRef],
        pairs: &[MatchPair],
        clusters: &[EntityCluster],
        malformed: &[MalformedAnnotation],
        skipped: &[OversizedBucket],
    ) -> Self {
        let id_counts: BTreeMap<EntityKey, usize> = entities
            .iter()
            .map(|e| (e.key(), e.identifier_count()))
            .collect();

        let rows = pairs
            .iter()
            .map(|pair| ReportRow {
                entity_a: pair.a.to_string(),
                entity_b: pair.b.to_string(),
                corpus_pair: pair.kind.to_string(),
                entity_a_identifier_count: id_counts.get(&pair.a).copied().unwrap_or(0),
                entity_b_identifier_count: id_counts.get(&pair.b).copied().unwrap_or(0),
                overlap_count: pair.overlap_count(),
                shared_identifiers: pair
                    .shared
                    .iter()
                    .map(Identifier::curie)
                    .collect::<Vec<_>>()
                    .join(" "),
            })
            .collect();

        let clustered = clusters.iter().map(EntityCluster::member_count).sum::<usize>();

        let summary = RunSummary {
            diagram_entities: entities
                .iter()
                .filter(|e| e.corpus == biokg_core::Corpus::Diagram)
                .count(),
            model_entities: entities
                .iter()
                .filter(|e| e.corpus == biokg_core::Corpus::Model)
                .count(),
            identifier_incidences: entities.iter().map(EntityRef::identifier_count).sum(),
            malformed_annotations: malformed.len(),
            pairs_total: pairs.len(),
            pairs_cross: pairs.iter().filter(|p| p.kind.is_cross()).count(),
            pairs_intra: pairs.iter().filter(|p| !p.kind.is_cross()).count(),
            oversized_buckets: skipped.len(),
            clusters: clusters.len(),
            conflicting_clusters: clusters.iter().filter(|c| c.is_conflicting()).count(),
            unclustered_entities: entities.len() - clustered,
        };

        Self {
            generated_at: Utc::now(),
            summary,
            rows,
        }
    }

    /// Write the per-pair table as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
