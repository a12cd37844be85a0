//! The assembled knowledge graph handed to the export collaborator

use crate::entity::EntityKey;
use crate::identifier::Identifier;
use crate::matching::CorpusPairKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What a graph node represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A resolved entity cluster
    Canonical,
    /// An unclustered entity kept for provenance only
    Provenance,
}

/// Back-reference from a node to one contributing entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct MemberRef {
    pub key: EntityKey,
    #[serde(default)]
    pub label: Option<String>,
}

/// One node of the knowledge graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub identifiers: BTreeSet<Identifier>,
    /// Contributing entities, for audit of why members were merged
    pub members: Vec<MemberRef>,
}

impl GraphNode {
    /// Source files contributing to this node
    pub fn source_files(&self) -> BTreeSet<&str> {
        self.members
            .iter()
            .map(|m| m.key.source_file.as_str())
            .collect()
    }
}

/// One undirected match edge between two distinct nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub node_a: String,
    pub node_b: String,
    /// The entity-level endpoints the edge was derived from
    pub entity_a: EntityKey,
    pub entity_b: EntityKey,
    pub shared_identifiers: BTreeSet<Identifier>,
    pub kind: CorpusPairKind,
    pub source_files: BTreeSet<String>,
}

/// The in-memory graph object. Construction is the core's side of the
/// contract; on-disk or database format is the export collaborator's.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl KnowledgeGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn canonical_node_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Canonical)
            .count()
    }

    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Node owning the given entity, if any
    pub fn node_for_entity(&self, key: &EntityKey) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.members.iter().any(|m| &m.key == key))
    }

    /// Serialize for the export collaborator
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Corpus;

    #[test]
    fn test_node_lookup() {
        let key = EntityKey::new(Corpus::Diagram, "map1.sbgn", "g1");
        let node = GraphNode {
            id: "hgnc:6010".into(),
            kind: NodeKind::Provenance,
            identifiers: [Identifier::new("hgnc", "6010")].into(),
            members: vec![MemberRef {
                key: key.clone(),
                label: Some("MAPK1".into()),
            }],
        };
        let graph = KnowledgeGraph {
            nodes: vec![node],
            edges: vec![],
        };

        assert_eq!(graph.node_count(), 1);
        assert!(graph.get_node("hgnc:6010").is_some());
        assert!(graph.node_for_entity(&key).is_some());
        assert_eq!(graph.canonical_node_count(), 0);
    }
}
