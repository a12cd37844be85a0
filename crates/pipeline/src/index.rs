//! Inverted identifier index across both corpora

use biokg_core::{EntityKey, EntityRef, Identifier};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Mapping from each identifier to the set of entities that carry it.
///
/// Built once per run, read-only afterwards. This is what keeps matching
/// away from the naive O(N·M) cross-product: only entities sharing at
/// least one identifier are ever compared.
///
/// Ordered maps/sets keep iteration deterministic, which downstream id
/// derivation relies on.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    buckets: BTreeMap<Identifier, BTreeSet<EntityKey>>,
}

impl InvertedIndex {
    /// Build the index from the full entity set of both corpora.
    ///
    /// Linear in the number of `(entity, identifier)` incidences.
    /// Per-chunk partial indexes are combined by set union, which is
    /// associative and commutative, so merge order is irrelevant.
    pub fn build(entities: &[EntityRef]) -> Self {
        let buckets = entities
            .par_iter()
            .fold(BTreeMap::<Identifier, BTreeSet<EntityKey>>::new, |mut acc, entity| {
                let key = entity.key();
                for identifier in entity.identifiers.keys() {
                    acc.entry(identifier.clone())
                        .or_default()
                        .insert(key.clone());
                }
                acc
            })
            .reduce(BTreeMap::new, |mut left, right| {
                for (identifier, keys) in right {
                    left.entry(identifier).or_default().extend(keys);
                }
                left
            });

        let index = Self { buckets };
        debug!(
            "Built inverted index: {} identifiers, {} incidences",
            index.len(),
            index.incidence_count()
        );
        index
    }

    /// Number of distinct identifiers indexed
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total `(identifier, entity)` incidences
    pub fn incidence_count(&self) -> usize {
        self.buckets.values().map(BTreeSet::len).sum()
    }

    /// Entities carrying the given identifier
    pub fn bucket(&self, identifier: &Identifier) -> Option<&BTreeSet<EntityKey>> {
        self.buckets.get(identifier)
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a Identifier, &'a BTreeSet<EntityKey>)> {
        self.buckets.iter()
    }

    /// Parallel iteration over buckets (independent units of aggregation work)
    pub fn par_iter<'a>(
        &'a self,
    ) -> impl ParallelIterator<Item = (&'a Identifier, &'a BTreeSet<EntityKey>)> + 'a {
        self.buckets.par_iter()
    }
}
