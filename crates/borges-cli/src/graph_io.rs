//! Reading graphs, search paths and configs from disk (or stdin), and writing
//! decorated graphs back out.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use borges_highlight::{GraphView, HighlightConfig, QueryResponse, SearchPath};

/// Read a file, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn load_graph(path: &Path) -> Result<GraphView> {
    let text = read_input(path)?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a {{nodes, links}} graph document", path.display()))
}

/// Accepts either a bare search path or the whole `/query` response envelope.
pub fn load_search_path(path: &Path) -> Result<SearchPath> {
    let text = read_input(path)?;
    parse_search_path(&text).with_context(|| format!("failed to load search path from {}", path.display()))
}

pub fn parse_search_path(text: &str) -> Result<SearchPath> {
    let value: Value = serde_json::from_str(text)?;
    let is_envelope = value
        .as_object()
        .is_some_and(|o| o.contains_key("searchPath") || o.contains_key("success"));

    if !is_envelope {
        return Ok(serde_json::from_value(value)?);
    }

    let response: QueryResponse = serde_json::from_value(value)?;
    if !response.success {
        if let Some(err) = response.error {
            return Err(anyhow!("query failed upstream: {err}"));
        }
    }
    Ok(response.search_path.unwrap_or_default())
}

pub fn load_config(path: Option<&Path>) -> Result<HighlightConfig> {
    let Some(path) = path else {
        return Ok(HighlightConfig::default());
    };
    let text = read_input(path)?;
    HighlightConfig::from_json_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

/// Write JSON to `out`, or stdout when no path is given.
pub fn write_json<T: Serialize>(out: Option<&Path>, value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_search_path_parses() {
        let sp = parse_search_path(r#"{"entities": [{"id": "Tlön", "order": 1, "score": 0.9}]}"#).unwrap();
        assert_eq!(sp.entities.len(), 1);
        assert!(sp.relations.is_empty());
    }

    #[test]
    fn envelope_is_unwrapped() {
        let sp = parse_search_path(
            r#"{"success": true, "answer": "...", "searchPath": {"entities": [], "relations": [{"source": "a", "target": "b", "traversalOrder": 1}]}}"#,
        )
        .unwrap();
        assert_eq!(sp.relations[0].traversal_order, 1);
    }

    #[test]
    fn failed_query_is_reported() {
        let err = parse_search_path(r#"{"success": false, "error": "Book not found"}"#).unwrap_err();
        assert!(err.to_string().contains("Book not found"));
    }

    #[test]
    fn envelope_without_path_is_empty() {
        let sp = parse_search_path(r#"{"success": true, "answer": "nothing relevant"}"#).unwrap();
        assert!(sp.is_empty());
    }

    #[test]
    fn graph_and_config_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let graph = dir.path().join("graph.json");
        fs::write(
            &graph,
            r#"{"nodes": [{"id": "a", "label": "A"}], "links": [{"source": "a", "target": "a"}]}"#,
        )
        .unwrap();
        let view = load_graph(&graph).unwrap();
        assert_eq!(view.nodes.len(), 1);
        assert_eq!(view.links[0].source_id().as_deref(), Some("a"));

        let loose = dir.path().join("loose.json");
        fs::write(
            &loose,
            r#"{"nodes": [{"id": 1}], "links": [{"source": null, "target": 1}, {"source": 1, "target": 1}]}"#,
        )
        .unwrap();
        let view = load_graph(&loose).unwrap();
        assert_eq!(view.nodes[0].id, "1");
        assert_eq!(view.links[0].source_id(), None);
        assert_eq!(view.links[1].source_id().as_deref(), Some("1"));

        let cfg = dir.path().join("cfg.json");
        fs::write(&cfg, r#"{"min_node_size": 4}"#).unwrap();
        assert_eq!(load_config(Some(&cfg)).unwrap().min_node_size, 4.0);
        assert_eq!(load_config(None).unwrap(), HighlightConfig::default());
    }
}
