//! End-to-end scenario tests for the matching pipeline

use biokg_core::{Corpus, Identifier, MatchConfig, NodeKind, ParsedEntity, ParsedFile};
use biokg_pipeline::{MatchOutcome, Pipeline};
use std::collections::BTreeSet;

fn parsed_file(name: &str, corpus: Corpus, entities: Vec<(&str, Vec<&str>)>) -> ParsedFile {
    ParsedFile {
        source_file: name.into(),
        corpus,
        entities: entities
            .into_iter()
            .map(|(id, annotations)| ParsedEntity {
                local_id: id.into(),
                label: None,
                annotations: annotations.into_iter().map(String::from).collect(),
            })
            .collect(),
    }
}

fn run(files: &[ParsedFile], config: MatchConfig) -> MatchOutcome {
    Pipeline::new(config).run(files).expect("pipeline run failed")
}

/// Two entities, one from each corpus, both tagged with (hgnc, 6010)
/// only: one match pair with overlap 1, one 2-member cluster.
#[test]
fn scenario_single_shared_identifier() {
    let files = vec![
        parsed_file(
            "map.sbgn",
            Corpus::Diagram,
            vec![("g1", vec!["http://identifiers.org/hgnc/6010"])],
        ),
        parsed_file(
            "model.xml",
            Corpus::Model,
            vec![("s1", vec!["http://identifiers.org/hgnc/6010"])],
        ),
    ];

    let outcome = run(&files, MatchConfig::default());

    assert_eq!(outcome.pairs.len(), 1);
    assert_eq!(outcome.pairs[0].overlap_count(), 1);
    assert_eq!(
        outcome.pairs[0].shared,
        BTreeSet::from([Identifier::new("hgnc", "6010")])
    );
    assert_eq!(outcome.clusters.len(), 1);
    assert_eq!(outcome.clusters[0].member_count(), 2);
    assert_eq!(outcome.clusters[0].id, "hgnc:6010");
}

/// Three entities (two diagram, one model) chained via distinct shared
/// identifiers - A-B share X, B-C share Y, A and C share nothing
/// directly: one 3-member cluster via transitive closure.
#[test]
fn scenario_transitive_chain() {
    let files = vec![
        parsed_file(
            "map1.sbgn",
            Corpus::Diagram,
            vec![("a", vec!["http://identifiers.org/hgnc/100"])],
        ),
        parsed_file(
            "map2.sbgn",
            Corpus::Diagram,
            vec![(
                "b",
                vec![
                    "http://identifiers.org/hgnc/100",
                    "http://identifiers.org/uniprot/P04637",
                ],
            )],
        ),
        parsed_file(
            "model.xml",
            Corpus::Model,
            vec![("c", vec!["http://identifiers.org/uniprot/P04637"])],
        ),
    ];

    let outcome = run(&files, MatchConfig::default());

    assert_eq!(outcome.pairs.len(), 2);
    assert_eq!(outcome.clusters.len(), 1);
    assert_eq!(outcome.clusters[0].member_count(), 3);

    // Two diagram members in one cluster is expected, not an error
    let diagram_members = outcome.clusters[0]
        .members
        .iter()
        .filter(|k| k.corpus == Corpus::Diagram)
        .count();
    assert_eq!(diagram_members, 2);
}

/// An entity with zero identifiers and grounding disabled remains an
/// unclustered provenance-only node and contributes zero match pairs.
#[test]
fn scenario_bare_entity_stays_unclustered() {
    let files = vec![
        parsed_file(
            "map.sbgn",
            Corpus::Diagram,
            vec![
                ("annotated", vec!["http://identifiers.org/hgnc/6010"]),
                ("bare", vec![]),
            ],
        ),
        parsed_file(
            "model.xml",
            Corpus::Model,
            vec![("s1", vec!["http://identifiers.org/hgnc/6010"])],
        ),
    ];

    let outcome = run(&files, MatchConfig::default());

    assert!(outcome
        .pairs
        .iter()
        .all(|p| p.a.local_id != "bare" && p.b.local_id != "bare"));

    let bare_node = outcome
        .graph
        .nodes
        .iter()
        .find(|n| n.members.iter().any(|m| m.key.local_id == "bare"))
        .expect("bare entity should still be a node");
    assert_eq!(bare_node.kind, NodeKind::Provenance);
    assert!(outcome
        .graph
        .edges
        .iter()
        .all(|e| e.node_a != bare_node.id && e.node_b != bare_node.id));
}

/// An identifier bucket over the configured cutoff generates no pairs
/// for that identifier, emits a diagnostic, and leaves the rest of the
/// pipeline unaffected.
#[test]
fn scenario_oversized_bucket_cutoff() {
    let degenerate = "http://identifiers.org/go/0008150";
    let files = vec![
        parsed_file(
            "map.sbgn",
            Corpus::Diagram,
            vec![
                ("g1", vec![degenerate]),
                ("g2", vec![degenerate]),
                ("g3", vec![degenerate, "http://identifiers.org/hgnc/1"]),
            ],
        ),
        parsed_file(
            "model.xml",
            Corpus::Model,
            vec![
                ("s1", vec![degenerate]),
                ("s2", vec!["http://identifiers.org/hgnc/1"]),
            ],
        ),
    ];

    let config = MatchConfig::default().with_max_bucket_size(3);
    let outcome = run(&files, config);

    assert_eq!(outcome.skipped_buckets.len(), 1);
    assert_eq!(
        outcome.skipped_buckets[0].identifier,
        Identifier::new("go", "0008150")
    );
    assert_eq!(outcome.skipped_buckets[0].size, 4);

    // The hgnc pair is unaffected by the skipped bucket
    assert_eq!(outcome.pairs.len(), 1);
    assert_eq!(
        outcome.pairs[0].shared,
        BTreeSet::from([Identifier::new("hgnc", "1")])
    );
    assert_eq!(outcome.report.summary.oversized_buckets, 1);
}

/// Clustering partitions the entity set: every entity is either in
/// exactly one cluster or unclustered, never in two.
#[test]
fn clustering_is_a_partition() {
    let files = vec![
        parsed_file(
            "map1.sbgn",
            Corpus::Diagram,
            vec![
                ("g1", vec!["http://identifiers.org/hgnc/1"]),
                ("g2", vec!["http://identifiers.org/chebi/15377"]),
                ("g3", vec![]),
            ],
        ),
        parsed_file(
            "model.xml",
            Corpus::Model,
            vec![
                ("s1", vec!["http://identifiers.org/hgnc/1"]),
                ("s2", vec!["http://identifiers.org/chebi/15377"]),
                ("s3", vec!["http://identifiers.org/pubchem.compound/962"]),
            ],
        ),
    ];

    let outcome = run(&files, MatchConfig::default());

    let mut seen = BTreeSet::new();
    for cluster in &outcome.clusters {
        for member in &cluster.members {
            assert!(seen.insert(member.clone()), "entity in two clusters");
        }
    }

    let clustered = seen.len();
    let total = outcome.entities.len();
    assert_eq!(outcome.report.summary.unclustered_entities, total - clustered);
    assert_eq!(clustered, 4);
    assert_eq!(total, 6);
}

/// Running the pipeline twice on identical input yields identical
/// cluster ids and edge sets, regardless of file order.
#[test]
fn pipeline_is_deterministic() {
    let file_a = parsed_file(
        "map1.sbgn",
        Corpus::Diagram,
        vec![
            ("g1", vec!["http://identifiers.org/hgnc/1"]),
            (
                "g2",
                vec![
                    "http://identifiers.org/hgnc/1",
                    "http://identifiers.org/uniprot/P1",
                ],
            ),
        ],
    );
    let file_b = parsed_file(
        "model.xml",
        Corpus::Model,
        vec![("s1", vec!["http://identifiers.org/uniprot/P1"])],
    );

    let forward = run(&[file_a.clone(), file_b.clone()], MatchConfig::default());
    let reverse = run(&[file_b, file_a], MatchConfig::default());

    let forward_ids: Vec<&str> = forward.clusters.iter().map(|c| c.id.as_str()).collect();
    let reverse_ids: Vec<&str> = reverse.clusters.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(forward_ids, reverse_ids);

    assert_eq!(forward.pairs, reverse.pairs);
    assert_eq!(forward.graph.node_count(), reverse.graph.node_count());
    assert_eq!(forward.graph.edge_count(), reverse.graph.edge_count());
}

/// Transitively merged clusters with conflicting accessions under one
/// namespace are emitted with the conflict surfaced.
#[test]
fn conflicting_cluster_is_surfaced_not_dropped() {
    let files = vec![
        parsed_file(
            "map.sbgn",
            Corpus::Diagram,
            vec![(
                "g1",
                vec![
                    "http://identifiers.org/hgnc/1",
                    "http://identifiers.org/uniprot/P1",
                ],
            )],
        ),
        parsed_file(
            "model.xml",
            Corpus::Model,
            vec![(
                "s1",
                vec![
                    "http://identifiers.org/uniprot/P1",
                    "http://identifiers.org/hgnc/2",
                ],
            )],
        ),
    ];

    let outcome = run(&files, MatchConfig::default());

    assert_eq!(outcome.clusters.len(), 1);
    assert!(outcome.clusters[0].is_conflicting());
    assert_eq!(outcome.report.summary.conflicting_clusters, 1);
}
