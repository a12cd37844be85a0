//! Grounding enrichment of extracted entities

use crate::{GroundingClient, Result};
use biokg_core::{EntityRef, GroundingPolicy, MatchConfig};
use biokg_pipeline::Extractor;
use tracing::{debug, info, instrument};

/// Report from an enrichment pass
#[derive(Debug, Default)]
pub struct EnrichmentReport {
    pub entities_queried: usize,
    pub entities_enriched: usize,
    pub candidates_accepted: usize,
    pub failures: usize,
}

/// Applies the configured grounding policy to an extracted entity set,
/// one service call per entity at most.
pub struct GroundingEnricher {
    client: GroundingClient,
    extractor: Extractor,
    policy: GroundingPolicy,
}

impl GroundingEnricher {
    pub fn new(client: GroundingClient, config: &MatchConfig) -> Self {
        Self {
            client,
            extractor: Extractor::new(config),
            policy: config.grounding,
        }
    }

    /// Ground entities in place according to the policy. Collaborator
    /// failure on any entity is recovered as zero candidates for that
    /// entity, never fatal.
    #[instrument(skip(self, entities))]
    pub async fn enrich(&self, entities: &mut [EntityRef]) -> Result<EnrichmentReport> {
        let mut report = EnrichmentReport::default();

        if self.policy == GroundingPolicy::Disabled {
            return Ok(report);
        }

        for entity in entities.iter_mut() {
            let wants_grounding = match self.policy {
                GroundingPolicy::Disabled => false,
                GroundingPolicy::MissingOnly => entity.has_no_explicit_identifiers(),
                GroundingPolicy::Always => true,
            };
            if !wants_grounding {
                continue;
            }

            let Some(label) = entity.label.clone() else {
                debug!("{}: no label to ground", entity.key());
                continue;
            };

            report.entities_queried += 1;

            let candidates = match self.client.ground(&label).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    debug!("{}: grounding unavailable ({}), treating as zero candidates", entity.key(), e);
                    report.failures += 1;
                    continue;
                }
            };

            let before = entity.identifier_count();
            self.extractor.apply_grounding(entity, &candidates);
            let accepted = entity.identifier_count() - before;
            if accepted > 0 {
                report.entities_enriched += 1;
                report.candidates_accepted += accepted;
            }
        }

        info!(
            "Grounding: {} queried, {} enriched, {} candidates accepted, {} failures",
            report.entities_queried,
            report.entities_enriched,
            report.candidates_accepted,
            report.failures
        );

        Ok(report)
    }
}
