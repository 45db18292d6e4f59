use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{json, Value};

fn borges_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_borges"))
}

fn run(args: &[&str]) -> Output {
    let out = Command::new(borges_bin())
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("run borges");
    assert!(
        out.status.success(),
        "borges {:?} failed:\n{}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    out
}

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let graph = dir.join("graph.json");
    fs::write(
        &graph,
        json!({
            "nodes": [
                {"id": "ALEPH", "label": "The Aleph", "type": "CONCEPT", "color": "#9b59b6", "size": 6},
                {"id": "carlos argentino", "label": "Carlos Argentino Daneri", "type": "PERSON", "color": "#ff6b6b", "size": 6},
                {"id": "BEATRIZ", "label": "Beatriz Viterbo", "type": "PERSON", "color": "#ff6b6b", "size": 6}
            ],
            "links": [
                {"id": "l1", "source": "carlos argentino", "target": "ALEPH", "relation": "OWNS"},
                {"id": "l2", "source": "BEATRIZ", "target": "carlos argentino", "relation": "COUSIN_OF"}
            ]
        })
        .to_string(),
    )
    .unwrap();

    let search_path = dir.join("response.json");
    fs::write(
        &search_path,
        json!({
            "success": true,
            "answer": "Daneri keeps the Aleph in his cellar.",
            "searchPath": {
                "entities": [
                    {"id": "ALEPH", "type": "CONCEPT", "order": 0, "score": 0.95},
                    {"id": "CARLOS_ARGENTINO", "type": "PERSON", "order": 1, "score": 0.7}
                ],
                "relations": [
                    {"source": "CARLOS_ARGENTINO", "target": "ALEPH", "traversalOrder": 1}
                ],
                "communities": []
            }
        })
        .to_string(),
    )
    .unwrap();

    (graph, search_path)
}

#[test]
fn highlight_writes_decorated_graph() {
    let dir = tempfile::tempdir().unwrap();
    let (graph, search_path) = write_inputs(dir.path());
    let out_path = dir.path().join("out.json");

    run(&[
        "highlight",
        "--graph",
        graph.to_str().unwrap(),
        "--search-path",
        search_path.to_str().unwrap(),
        "--out",
        out_path.to_str().unwrap(),
        "--pretty",
    ]);

    let out: Value = serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(out["nodes"][0]["highlighted"], json!(true));
    assert_eq!(out["nodes"][1]["highlighted"], json!(true));
    assert_eq!(out["nodes"][2]["dimmed"], json!(true));
    assert_eq!(out["links"][0]["traversalOrder"], json!(1));
    assert_eq!(out["links"][1]["contextual"], json!(true));
}

#[test]
fn highlight_roundtrip_restores_input() {
    let dir = tempfile::tempdir().unwrap();
    let (graph, search_path) = write_inputs(dir.path());

    let out = run(&[
        "highlight",
        "--graph",
        graph.to_str().unwrap(),
        "--search-path",
        search_path.to_str().unwrap(),
        "--roundtrip",
    ]);

    let restored: Value = serde_json::from_slice(&out.stdout).unwrap();
    for node in restored["nodes"].as_array().unwrap() {
        assert_eq!(node["highlighted"], json!(false));
        assert_eq!(node["dimmed"], json!(false));
        assert!(node.get("searchOrder").is_none());
    }
    assert_eq!(restored["nodes"][0]["color"], json!("#9b59b6"));
}

#[test]
fn classify_reports_link_classes_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let (graph, search_path) = write_inputs(dir.path());

    let out = run(&[
        "classify",
        "--graph",
        graph.to_str().unwrap(),
        "--search-path",
        search_path.to_str().unwrap(),
        "--json",
    ]);

    let stats: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(stats["highlightedNodes"], json!(2));
    assert_eq!(stats["linkClasses"]["primary"], json!(1));
    assert_eq!(stats["linkClasses"]["contextual"], json!(1));
}

#[test]
fn reconcile_lists_every_entity() {
    let dir = tempfile::tempdir().unwrap();
    let (graph, search_path) = write_inputs(dir.path());

    let out = run(&[
        "reconcile",
        "--graph",
        graph.to_str().unwrap(),
        "--search-path",
        search_path.to_str().unwrap(),
    ]);

    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("2 of 2 entities matched"), "{text}");
    assert!(text.contains("exact"));
    assert!(text.contains("fuzzy"));
}

#[test]
fn import_neo4j_builds_graph_document() {
    let dir = tempfile::tempdir().unwrap();
    let nodes = dir.path().join("nodes.json");
    let rels = dir.path().join("rels.json");
    fs::write(
        &nodes,
        json!({"nodes": [
            {"id": "FUNES", "labels": ["PERSON"], "properties": {"name": "Ireneo Funes"}, "degree": 4, "centrality_score": 0.2},
            {"id": "FRAY BENTOS", "labels": ["GEO"], "properties": {}, "degree": 1, "centrality_score": 0.1}
        ]})
        .to_string(),
    )
    .unwrap();
    fs::write(
        &rels,
        json!({"relationships": [
            {"id": 7, "type": "LIVES_IN", "source": "FUNES", "target": "FRAY BENTOS", "properties": {}}
        ]})
        .to_string(),
    )
    .unwrap();

    let out = run(&[
        "import-neo4j",
        "--nodes",
        nodes.to_str().unwrap(),
        "--relationships",
        rels.to_str().unwrap(),
    ]);

    let view: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(view["nodes"][0]["label"], json!("Ireneo Funes"));
    assert_eq!(view["nodes"][0]["size"], json!(7.0));
    assert_eq!(view["nodes"][1]["type"], json!("GEO"));
    assert_eq!(view["links"][0]["id"], json!("7"));
    assert_eq!(view["links"][0]["relation"], json!("LIVES_IN"));
}
