//! Run-wide configuration, threaded explicitly through each stage

use serde::{Deserialize, Serialize};

/// When to call the grounding service for an entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroundingPolicy {
    /// Never call the grounding service
    #[default]
    Disabled,
    /// Ground only entities with no explicit annotation
    MissingOnly,
    /// Ground every entity
    Always,
}

/// Configuration for one matching run.
///
/// Passed by reference into every stage rather than held as ambient
/// state, so stages stay independently testable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum shared-identifier count for a pair to be retained
    pub min_overlap: usize,

    /// Minimum shared-identifier count for a pair to merge its endpoints
    /// into one cluster. Defaults to `min_overlap`; retained pairs below
    /// this threshold become cross-cluster graph edges instead.
    pub cluster_min_overlap: usize,

    /// Identifier buckets larger than this skip pair generation entirely
    /// (degenerate near-ubiquitous accessions), with a diagnostic.
    pub max_bucket_size: Option<usize>,

    /// Grounding candidates below this confidence are discarded
    pub confidence_floor: f32,

    pub grounding: GroundingPolicy,

    /// Emit provenance-only nodes for unclustered entities
    pub include_unmatched: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_overlap: 1,
            cluster_min_overlap: 1,
            max_bucket_size: None,
            confidence_floor: 0.7,
            grounding: GroundingPolicy::Disabled,
            include_unmatched: true,
        }
    }
}

impl MatchConfig {
    /// Builder: set the pair-retention threshold (and raise the cluster
    /// threshold to match if it would fall below it)
    pub fn with_min_overlap(mut self, min_overlap: usize) -> Self {
        self.min_overlap = min_overlap;
        if self.cluster_min_overlap < min_overlap {
            self.cluster_min_overlap = min_overlap;
        }
        self
    }

    /// Builder: set the clustering threshold
    pub fn with_cluster_min_overlap(mut self, cluster_min_overlap: usize) -> Self {
        self.cluster_min_overlap = cluster_min_overlap;
        self
    }

    /// Builder: set the oversized-bucket cutoff
    pub fn with_max_bucket_size(mut self, max_bucket_size: usize) -> Self {
        self.max_bucket_size = Some(max_bucket_size);
        self
    }

    /// Builder: set the grounding confidence floor
    pub fn with_confidence_floor(mut self, confidence_floor: f32) -> Self {
        self.confidence_floor = confidence_floor.clamp(0.0, 1.0);
        self
    }

    /// Builder: set the grounding policy
    pub fn with_grounding(mut self, grounding: GroundingPolicy) -> Self {
        self.grounding = grounding;
        self
    }

    /// Builder: toggle provenance-only nodes
    pub fn with_include_unmatched(mut self, include_unmatched: bool) -> Self {
        self.include_unmatched = include_unmatched;
        self
    }
}
