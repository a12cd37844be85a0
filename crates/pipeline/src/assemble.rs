//! Knowledge-graph assembly from clusters and residual entities

use biokg_core::{
    EntityCluster, EntityKey, EntityRef, GraphEdge, GraphNode, KnowledgeGraph, MatchConfig,
    MatchPair, MemberRef, NodeKind,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Converts clusters into canonical nodes, unclustered entities into
/// provenance-only nodes, and retained pairs into match edges.
///
/// Every node keeps full back-references to its contributing entities
/// and source files, so a merge can always be audited.
#[derive(Debug, Clone)]
pub struct GraphAssembler {
    include_unmatched: bool,
}

impl GraphAssembler {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            include_unmatched: config.include_unmatched,
        }
    }

    pub fn assemble(
        &self,
        entities: &[EntityRef],
        clusters: &[EntityCluster],
        pairs: &[MatchPair],
    ) -> KnowledgeGraph {
        let by_key: BTreeMap<EntityKey, &EntityRef> =
            entities.iter().map(|e| (e.key(), e)).collect();

        let mut nodes = Vec::new();
        let mut node_of_entity: BTreeMap<EntityKey, String> = BTreeMap::new();

        for cluster in clusters {
            for member in &cluster.members {
                node_of_entity.insert(member.clone(), cluster.id.clone());
            }
            nodes.push(GraphNode {
                id: cluster.id.clone(),
                kind: NodeKind::Canonical,
                identifiers: cluster.identifiers.clone(),
                members: cluster
                    .members
                    .iter()
                    .map(|key| MemberRef {
                        key: key.clone(),
                        label: by_key.get(key).and_then(|e| e.label.clone()),
                    })
                    .collect(),
            });
        }

        if self.include_unmatched {
            for entity in entities {
                let key = entity.key();
                if node_of_entity.contains_key(&key) {
                    continue;
                }
                let id = key.to_string();
                node_of_entity.insert(key.clone(), id.clone());
                nodes.push(GraphNode {
                    id,
                    kind: NodeKind::Provenance,
                    identifiers: entity.identifiers.keys().cloned().collect(),
                    members: vec![MemberRef {
                        key,
                        label: entity.label.clone(),
                    }],
                });
            }
        }

        // A retained pair whose endpoints resolved to the same node is an
        // intra-cluster justification (already carried on the cluster);
        // only pairs spanning distinct nodes become graph edges.
        let mut edges = Vec::new();
        for pair in pairs {
            let (Some(node_a), Some(node_b)) =
                (node_of_entity.get(&pair.a), node_of_entity.get(&pair.b))
            else {
                continue;
            };
            if node_a == node_b {
                continue;
            }
            let source_files: BTreeSet<String> = [
                pair.a.source_file.clone(),
                pair.b.source_file.clone(),
            ]
            .into();
            edges.push(GraphEdge {
                node_a: node_a.clone(),
                node_b: node_b.clone(),
                entity_a: pair.a.clone(),
                entity_b: pair.b.clone(),
                shared_identifiers: pair.shared.clone(),
                kind: pair.kind,
                source_files,
            });
        }

        debug!(
            "Assembled graph: {} nodes ({} canonical), {} edges",
            nodes.len(),
            clusters.len(),
            edges.len()
        );

        KnowledgeGraph { nodes, edges }
    }
}
