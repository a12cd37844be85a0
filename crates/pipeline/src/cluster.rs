//! Entity-resolution clustering via union-find

use biokg_core::{
    EntityCluster, EntityKey, EntityRef, Identifier, MatchConfig, MatchPair, NamespaceConflict,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Disjoint-set forest over entity indices.
///
/// An arena of parent/rank vectors rather than pointer-linked nodes:
/// allocation-free unions and cache-friendly finds. The union phase is
/// single-owner; parallel callers must apply unions under exclusive
/// access.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    /// Find the set representative, compressing the path on the way up
    pub fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Union by rank; returns false if the two were already joined
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

/// Groups entities transitively connected by qualifying match pairs into
/// canonical clusters.
#[derive(Debug, Clone)]
pub struct Clusterer {
    cluster_min_overlap: usize,
}

impl Clusterer {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            cluster_min_overlap: config.cluster_min_overlap,
        }
    }

    /// Partition the entity set: every connected component of qualifying
    /// pairs becomes one cluster; entities without a qualifying match
    /// stay unclustered (not an error).
    ///
    /// Entity order is normalized internally, so the resulting cluster
    /// ids do not depend on input processing order.
    pub fn cluster(&self, entities: &[EntityRef], pairs: &[MatchPair]) -> Vec<EntityCluster> {
        // Stable index assignment over sorted keys
        let mut keys: Vec<EntityKey> = entities.iter().map(EntityRef::key).collect();
        keys.sort();
        keys.dedup();
        let index_of: BTreeMap<&EntityKey, usize> =
            keys.iter().enumerate().map(|(i, k)| (k, i)).collect();

        let by_key: BTreeMap<EntityKey, &EntityRef> =
            entities.iter().map(|e| (e.key(), e)).collect();

        let mut sets = DisjointSet::new(keys.len());
        for pair in pairs {
            if pair.overlap_count() < self.cluster_min_overlap {
                continue;
            }
            let (Some(&a), Some(&b)) = (index_of.get(&pair.a), index_of.get(&pair.b)) else {
                continue;
            };
            sets.union(a, b);
        }

        // Group members by component root
        let mut components: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for i in 0..keys.len() {
            let root = sets.find(i);
            components.entry(root).or_default().push(i);
        }

        let mut clusters = Vec::new();
        for (_, member_indices) in components {
            if member_indices.len() < 2 {
                continue;
            }

            let members: BTreeSet<EntityKey> = member_indices
                .iter()
                .map(|&i| keys[i].clone())
                .collect();

            let identifiers: BTreeSet<Identifier> = members
                .iter()
                .filter_map(|k| by_key.get(k))
                .flat_map(|e| e.identifiers.keys().cloned())
                .collect();

            let edges: Vec<MatchPair> = pairs
                .iter()
                .filter(|p| {
                    p.overlap_count() >= self.cluster_min_overlap
                        && members.contains(&p.a)
                        && members.contains(&p.b)
                })
                .cloned()
                .collect();

            let conflicts = detect_conflicts(&identifiers);
            let id = EntityCluster::canonical_id(&identifiers);
            if !conflicts.is_empty() {
                warn!(
                    "conflicting cluster {} ({} members): {} namespace(s) with multiple accessions",
                    id,
                    members.len(),
                    conflicts.len()
                );
            }

            clusters.push(EntityCluster {
                id,
                members,
                identifiers,
                edges,
                conflicts,
            });
        }

        debug!(
            "Clustered {} entities into {} clusters ({} conflicting)",
            entities.len(),
            clusters.len(),
            clusters.iter().filter(|c| c.is_conflicting()).count()
        );

        clusters
    }
}

/// Namespaces appearing with more than one accession in a cluster union
fn detect_conflicts(identifiers: &BTreeSet<Identifier>) -> Vec<NamespaceConflict> {
    let mut by_namespace: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for identifier in identifiers {
        by_namespace
            .entry(&identifier.namespace)
            .or_default()
            .insert(&identifier.accession);
    }

    by_namespace
        .into_iter()
        .filter(|(_, accessions)| accessions.len() > 1)
        .map(|(namespace, accessions)| NamespaceConflict {
            namespace: namespace.to_string(),
            accessions: accessions.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use biokg_core::{Corpus, Provenance};

    fn entity(corpus: Corpus, file: &str, id: &str, curies: &[(&str, &str)]) -> EntityRef {
        let mut e = EntityRef::new(corpus, file, id);
        for (ns, acc) in curies {
            e.add_identifier(Identifier::new(*ns, *acc), Provenance::Explicit);
        }
        e
    }

    fn pair(a: &EntityRef, b: &EntityRef, curies: &[(&str, &str)]) -> MatchPair {
        let shared: BTreeSet<Identifier> = curies
            .iter()
            .map(|(ns, acc)| Identifier::new(*ns, *acc))
            .collect();
        MatchPair::new(a.key(), b.key(), shared)
    }

    #[test]
    fn test_disjoint_set_basics() {
        let mut sets = DisjointSet::new(4);
        assert!(sets.union(0, 1));
        assert!(sets.union(2, 3));
        assert!(!sets.union(1, 0));
        assert_ne!(sets.find(0), sets.find(2));

        sets.union(1, 2);
        assert_eq!(sets.find(0), sets.find(3));
    }

    #[test]
    fn test_transitive_closure_forms_one_cluster() {
        // A-B share X, B-C share Y, A and C share nothing directly
        let a = entity(Corpus::Diagram, "a.sbgn", "g1", &[("hgnc", "x")]);
        let b = entity(
            Corpus::Diagram,
            "b.sbgn",
            "g2",
            &[("hgnc", "x"), ("uniprot", "y")],
        );
        let c = entity(Corpus::Model, "m.xml", "s1", &[("uniprot", "y")]);
        let entities = vec![a.clone(), b.clone(), c.clone()];
        let pairs = vec![
            pair(&a, &b, &[("hgnc", "x")]),
            pair(&b, &c, &[("uniprot", "y")]),
        ];

        let clusters = Clusterer::new(&MatchConfig::default()).cluster(&entities, &pairs);

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].member_count(), 3);
        assert_eq!(clusters[0].edges.len(), 2);
    }

    #[test]
    fn test_partition_property() {
        let a = entity(Corpus::Diagram, "a.sbgn", "g1", &[("hgnc", "1")]);
        let b = entity(Corpus::Model, "m.xml", "s1", &[("hgnc", "1")]);
        let loner = entity(Corpus::Model, "m.xml", "s2", &[("chebi", "9")]);
        let entities = vec![a.clone(), b.clone(), loner.clone()];
        let pairs = vec![pair(&a, &b, &[("hgnc", "1")])];

        let clusters = Clusterer::new(&MatchConfig::default()).cluster(&entities, &pairs);

        let clustered: BTreeSet<EntityKey> = clusters
            .iter()
            .flat_map(|c| c.members.iter().cloned())
            .collect();

        assert_eq!(clusters.len(), 1);
        assert!(clustered.contains(&a.key()));
        assert!(clustered.contains(&b.key()));
        assert!(!clustered.contains(&loner.key()));
    }

    #[test]
    fn test_cluster_min_overlap_gates_union() {
        let a = entity(
            Corpus::Diagram,
            "a.sbgn",
            "g1",
            &[("hgnc", "1"), ("uniprot", "P1")],
        );
        let b = entity(
            Corpus::Model,
            "m.xml",
            "s1",
            &[("hgnc", "1"), ("uniprot", "P1")],
        );
        let c = entity(Corpus::Model, "m.xml", "s2", &[("hgnc", "1")]);
        let entities = vec![a.clone(), b.clone(), c.clone()];
        let pairs = vec![
            pair(&a, &b, &[("hgnc", "1"), ("uniprot", "P1")]),
            pair(&a, &c, &[("hgnc", "1")]),
            pair(&b, &c, &[("hgnc", "1")]),
        ];

        let config = MatchConfig::default().with_cluster_min_overlap(2);
        let clusters = Clusterer::new(&config).cluster(&entities, &pairs);

        // Only the overlap-2 pair merges; c stays out
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].member_count(), 2);
        assert!(!clusters[0].members.contains(&c.key()));
    }

    #[test]
    fn test_conflicting_cluster_is_emitted_with_warning_attached() {
        // Chained pairs pull hgnc:1 and hgnc:2 into one component
        let a = entity(Corpus::Diagram, "a.sbgn", "g1", &[("hgnc", "1"), ("uniprot", "P1")]);
        let b = entity(Corpus::Model, "m.xml", "s1", &[("uniprot", "P1"), ("hgnc", "2")]);
        let entities = vec![a.clone(), b.clone()];
        let pairs = vec![pair(&a, &b, &[("uniprot", "P1")])];

        let clusters = Clusterer::new(&MatchConfig::default()).cluster(&entities, &pairs);

        assert_eq!(clusters.len(), 1);
        assert!(clusters[0].is_conflicting());
        assert_eq!(clusters[0].conflicts[0].namespace, "hgnc");
        assert_eq!(clusters[0].conflicts[0].accessions.len(), 2);
    }

    #[test]
    fn test_cluster_ids_do_not_depend_on_input_order() {
        let a = entity(Corpus::Diagram, "a.sbgn", "g1", &[("hgnc", "1")]);
        let b = entity(Corpus::Model, "m.xml", "s1", &[("hgnc", "1")]);
        let pairs = vec![pair(&a, &b, &[("hgnc", "1")])];

        let clusterer = Clusterer::new(&MatchConfig::default());
        let forward = clusterer.cluster(&[a.clone(), b.clone()], &pairs);
        let reverse = clusterer.cluster(&[b, a], &pairs);

        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].id, reverse[0].id);
        assert_eq!(forward[0].members, reverse[0].members);
    }
}
