//! The staged matching pipeline

use crate::aggregate::{Aggregator, OversizedBucket};
use crate::assemble::GraphAssembler;
use crate::cluster::Clusterer;
use crate::extract::{ExtractedCorpus, Extractor};
use crate::index::InvertedIndex;
use crate::report::RunReport;
use crate::Result;
use biokg_core::{
    Corpus, CoreError, EntityCluster, EntityRef, KnowledgeGraph, MatchConfig, MatchPair,
    ParsedFile,
};
use tracing::{info, instrument};

/// Everything a finished run produces
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub entities: Vec<EntityRef>,
    pub pairs: Vec<MatchPair>,
    pub skipped_buckets: Vec<OversizedBucket>,
    pub clusters: Vec<EntityCluster>,
    pub graph: KnowledgeGraph,
    pub report: RunReport,
}

/// The stage sequence: extract, index, aggregate, cluster, assemble.
///
/// Each stage is a batch transformation over immutable collections; no
/// stage mutates another stage's output. Grounding enrichment, when
/// enabled, happens between `extract` and `resolve` in the caller's
/// hands (it needs the async grounding client).
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: MatchConfig,
}

impl Pipeline {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Stage 1: extraction over both corpora
    #[instrument(skip(self, files))]
    pub fn extract(&self, files: &[ParsedFile]) -> ExtractedCorpus {
        Extractor::new(&self.config).extract_corpus(files)
    }

    /// Stages 2-5 over an already-extracted (and optionally grounded)
    /// entity set.
    ///
    /// An empty corpus on either side is fatal: no meaningful comparison
    /// is possible, so the run aborts before clustering. Every other
    /// degraded condition completes with diagnostics.
    #[instrument(skip(self, extracted))]
    pub fn resolve(&self, extracted: ExtractedCorpus) -> Result<MatchOutcome> {
        let entities = extracted.entities;

        for corpus in [Corpus::Diagram, Corpus::Model] {
            if !entities.iter().any(|e| e.corpus == corpus) {
                return Err(CoreError::EmptyCorpus(corpus).into());
            }
        }

        let index = InvertedIndex::build(&entities);
        info!(
            "Indexed {} identifiers across {} entities",
            index.len(),
            entities.len()
        );

        let aggregated = Aggregator::new(&self.config).aggregate(&index);
        info!(
            "Found {} match pairs ({} oversized buckets skipped)",
            aggregated.pairs.len(),
            aggregated.skipped.len()
        );

        let clusters = Clusterer::new(&self.config).cluster(&entities, &aggregated.pairs);
        info!("Resolved {} entity clusters", clusters.len());

        let graph = GraphAssembler::new(&self.config).assemble(
            &entities,
            &clusters,
            &aggregated.pairs,
        );
        info!(
            "Assembled knowledge graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        let report = RunReport::build(
            &entities,
            &aggregated.pairs,
            &clusters,
            &extracted.malformed,
            &aggregated.skipped,
        );

        Ok(MatchOutcome {
            entities,
            pairs: aggregated.pairs,
            skipped_buckets: aggregated.skipped,
            clusters,
            graph,
            report,
        })
    }

    /// Full run without grounding: extract then resolve
    pub fn run(&self, files: &[ParsedFile]) -> Result<MatchOutcome> {
        let extracted = self.extract(files);
        self.resolve(extracted)
    }
}
