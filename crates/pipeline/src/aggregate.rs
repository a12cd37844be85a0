//! Pairwise match aggregation over the inverted index

use crate::index::InvertedIndex;
use biokg_core::{EntityKey, Identifier, MatchConfig, MatchPair};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Diagnostic for an identifier bucket that exceeded the configured
/// cutoff: its `k·(k−1)/2` pair generation was skipped, the rest of the
/// run is unaffected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OversizedBucket {
    pub identifier: Identifier,
    pub size: usize,
}

/// Result of aggregation: the retained pairs plus skip diagnostics
#[derive(Debug, Clone, Default)]
pub struct AggregateOutcome {
    /// Retained pairs in deterministic (endpoint) order
    pub pairs: Vec<MatchPair>,
    pub skipped: Vec<OversizedBucket>,
}

type PairAccumulator = BTreeMap<(EntityKey, EntityKey), BTreeSet<Identifier>>;

/// Produces, for every pair of entities sharing at least one identifier,
/// the set of shared identifiers - without enumerating the cross-product.
#[derive(Debug, Clone)]
pub struct Aggregator {
    min_overlap: usize,
    max_bucket_size: Option<usize>,
}

impl Aggregator {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            min_overlap: config.min_overlap,
            max_bucket_size: config.max_bucket_size,
        }
    }

    /// Walk every identifier bucket, generate the unordered pairs inside
    /// it, and accumulate the running shared set per pair (a pair can
    /// co-occur under several identifiers).
    ///
    /// Buckets are independent, so the per-bucket work runs in parallel;
    /// per-bucket accumulators only need a final union across buckets.
    pub fn aggregate(&self, index: &InvertedIndex) -> AggregateOutcome {
        let cutoff = self.max_bucket_size.unwrap_or(usize::MAX);

        let (accumulated, skipped): (PairAccumulator, Vec<OversizedBucket>) = index
            .par_iter()
            .fold(
                || (PairAccumulator::new(), Vec::new()),
                |(mut acc, mut skipped), (identifier, bucket)| {
                    let k = bucket.len();
                    if k > cutoff {
                        warn!(
                            "skipping oversized bucket {} ({} entities > cutoff {})",
                            identifier, k, cutoff
                        );
                        skipped.push(OversizedBucket {
                            identifier: identifier.clone(),
                            size: k,
                        });
                        return (acc, skipped);
                    }

                    let keys: Vec<&EntityKey> = bucket.iter().collect();
                    for i in 0..keys.len() {
                        for j in (i + 1)..keys.len() {
                            // Bucket iteration is ordered, so keys[i] < keys[j]
                            let pair_key = (keys[i].clone(), keys[j].clone());
                            acc.entry(pair_key).or_default().insert(identifier.clone());
                        }
                    }
                    (acc, skipped)
                },
            )
            .reduce(
                || (PairAccumulator::new(), Vec::new()),
                |(mut left, mut left_skipped), (right, right_skipped)| {
                    for (pair_key, shared) in right {
                        left.entry(pair_key).or_default().extend(shared);
                    }
                    left_skipped.extend(right_skipped);
                    (left, left_skipped)
                },
            );

        // Threshold filter happens here; pairs below it are discarded,
        // not stored.
        let pairs: Vec<MatchPair> = accumulated
            .into_iter()
            .filter(|(_, shared)| shared.len() >= self.min_overlap)
            .map(|((a, b), shared)| MatchPair::new(a, b, shared))
            .collect();

        let mut skipped = skipped;
        skipped.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        debug!(
            "Aggregated {} match pairs (min overlap {}), {} oversized buckets skipped",
            pairs.len(),
            self.min_overlap,
            skipped.len()
        );

        AggregateOutcome { pairs, skipped }
    }
}
