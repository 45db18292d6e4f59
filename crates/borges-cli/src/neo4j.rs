//! Convert graph-store API payloads into the `{nodes, links}` graph document.
//!
//! The graph store serves two endpoints:
//! - `/nodes`: `{nodes: [{id, labels, properties, degree, centrality_score}]}`
//! - `/relationships`: `{relationships: [{id, type, source, target, properties}]}`
//!
//! Fetching is someone else's job; this only reshapes saved responses.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use borges_highlight::encoding::EntityCategory;
use borges_highlight::{GraphLink, GraphNode, GraphView};

#[derive(Debug, Clone, Deserialize)]
pub struct NodesPayload {
    #[serde(default)]
    pub nodes: Vec<StoreNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreNode {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub degree: u32,
    #[serde(default)]
    pub centrality_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipsPayload {
    #[serde(default)]
    pub relationships: Vec<StoreRelationship>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreRelationship {
    #[serde(default)]
    pub id: Value,
    #[serde(default, rename = "type")]
    pub rel_type: String,
    #[serde(default)]
    pub source: Value,
    #[serde(default)]
    pub target: Value,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

fn scalar_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_prop(props: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| props.get(*k).and_then(Value::as_str))
        .map(|s| s.trim().trim_matches('"').to_string())
        .filter(|s| !s.is_empty())
}

/// Display size grows slowly with degree so hubs stand out without dwarfing the rest.
fn size_for_degree(degree: u32) -> f64 {
    5.0 + f64::from(degree).sqrt()
}

pub fn node_from_store(node: &StoreNode) -> Option<GraphNode> {
    let Some(id) = scalar_id(&node.id) else {
        warn!(labels = ?node.labels, "skipping graph-store node without an id");
        return None;
    };
    let label = string_prop(&node.properties, &["name", "label", "title"]).unwrap_or_else(|| id.clone());
    let node_type = string_prop(&node.properties, &["entity_type", "type"])
        .or_else(|| node.labels.first().cloned())
        .unwrap_or_default();

    let mut out = GraphNode::new(id, label, node_type);
    out.color = EntityCategory::from_type(&out.node_type).base_color().to_string();
    out.size = size_for_degree(node.degree);
    out.degree = node.degree;
    out.centrality_score = node.centrality_score;
    if let Some(description) = node.properties.get("description") {
        out.extra.insert("description".to_string(), description.clone());
    }
    Some(out)
}

pub fn link_from_store(rel: &StoreRelationship) -> Option<GraphLink> {
    let (Some(source), Some(target)) = (scalar_id(&rel.source), scalar_id(&rel.target)) else {
        warn!(id = %rel.id, "skipping graph-store relationship with a missing endpoint");
        return None;
    };
    let mut out = GraphLink::new(scalar_id(&rel.id).unwrap_or_default(), source, target, rel.rel_type.clone());
    if let Some(w) = rel.properties.get("weight").and_then(Value::as_f64) {
        out.weight = w;
    }
    Some(out)
}

pub fn graph_from_store(nodes: &NodesPayload, relationships: &RelationshipsPayload) -> GraphView {
    GraphView {
        nodes: nodes.nodes.iter().filter_map(node_from_store).collect(),
        links: relationships
            .relationships
            .iter()
            .filter_map(link_from_store)
            .collect(),
    }
}
