//! End-to-end tests for the biokg binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn write_diagram_fixture(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("diagram.json");
    std::fs::write(
        &path,
        r#"{
            "source_file": "map1.sbgn",
            "corpus": "diagram",
            "entities": [
                {"local_id": "glyph1", "label": "MAPK1", "annotations": ["http://identifiers.org/hgnc/6871"]},
                {"local_id": "glyph2", "label": "water", "annotations": ["http://identifiers.org/chebi/15377"]},
                {"local_id": "glyph3", "annotations": ["not a uri"]}
            ]
        }"#,
    )
    .unwrap();
    path
}

fn write_model_fixture(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("model.json");
    std::fs::write(
        &path,
        r#"{
            "source_file": "model1.xml",
            "corpus": "model",
            "entities": [
                {"local_id": "s1", "label": "MAPK1", "annotations": ["http://identifiers.org/HGNC/6871"]},
                {"local_id": "s2", "annotations": []}
            ]
        }"#,
    )
    .unwrap();
    path
}

#[test]
fn test_match_writes_report_and_graph() {
    let dir = tempfile::tempdir().unwrap();
    let diagram = write_diagram_fixture(dir.path());
    let model = write_model_fixture(dir.path());
    let report = dir.path().join("report.csv");
    let graph = dir.path().join("graph.json");

    let mut cmd = Command::cargo_bin("biokg").unwrap();
    cmd.arg("match")
        .arg("--diagram")
        .arg(&diagram)
        .arg("--model")
        .arg(&model)
        .arg("--report")
        .arg(&report)
        .arg("--graph")
        .arg(&graph);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Match summary:"))
        .stdout(predicate::str::contains("1 cross-corpus"));

    let csv = std::fs::read_to_string(&report).unwrap();
    assert!(csv.contains("entity_a,entity_b,corpus_pair"));
    assert!(csv.contains("hgnc:6871"));
    assert!(csv.contains("diagram/map1.sbgn#glyph1"));

    let graph_json = std::fs::read_to_string(&graph).unwrap();
    assert!(graph_json.contains("\"canonical\""));
    assert!(graph_json.contains("hgnc:6871"));
}

#[test]
fn test_match_fails_on_empty_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let diagram = write_diagram_fixture(dir.path());
    let empty_model = dir.path().join("empty.json");
    std::fs::write(
        &empty_model,
        r#"{"source_file": "empty.xml", "corpus": "model", "entities": []}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("biokg").unwrap();
    cmd.arg("match")
        .arg("--diagram")
        .arg(&diagram)
        .arg("--model")
        .arg(&empty_model);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("contains no entities"));
}

#[test]
fn test_extract_lists_identifiers_and_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let diagram = write_diagram_fixture(dir.path());

    let mut cmd = Command::cargo_bin("biokg").unwrap();
    cmd.arg("extract").arg(&diagram);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hgnc:6871"))
        .stdout(predicate::str::contains("chebi:15377"))
        .stdout(predicate::str::contains("Malformed annotations (1):"));
}

#[test]
fn test_match_requires_both_corpora() {
    let dir = tempfile::tempdir().unwrap();
    let diagram = write_diagram_fixture(dir.path());

    let mut cmd = Command::cargo_bin("biokg").unwrap();
    cmd.arg("match").arg("--diagram").arg(&diagram);

    cmd.assert().failure();
}
