//! Wire types shared with the GraphRAG query service and the graph renderer.
//!
//! Field names follow the JSON the services exchange (`searchPath`,
//! `traversalOrder`, ...). The only snake_case field is `centrality_score`,
//! which is how the graph store reports it.
//!
//! Renderer-owned fields we do not understand (layout coordinates, velocities,
//! `__indexColor`, ...) are carried through untouched via `extra`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ============================================================================
// Search path (produced by the GraphRAG query)
// ============================================================================

/// The ranked reasoning trace behind a GraphRAG answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPath {
    #[serde(default)]
    pub entities: Vec<SearchPathEntity>,
    #[serde(default)]
    pub relations: Vec<SearchPathRelation>,
    #[serde(default)]
    pub communities: Vec<SearchPathCommunity>,
}

impl SearchPath {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPathEntity {
    pub id: String,
    /// Retrieval relevance in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// 1-based position in the reasoning trace.
    #[serde(default)]
    pub order: u32,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl SearchPathEntity {
    pub fn new(id: impl Into<String>, score: f64, order: u32) -> Self {
        Self {
            id: id.into(),
            score: Some(score),
            order,
            entity_type: None,
            description: None,
            rank: None,
        }
    }

    pub fn with_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPathRelation {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub traversal_order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl SearchPathRelation {
    pub fn new(source: impl Into<String>, target: impl Into<String>, traversal_order: u32) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            traversal_order,
            weight: None,
            description: None,
            rank: None,
        }
    }
}

/// Community summaries are passed through; highlighting does not read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPathCommunity {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub relevance: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Envelope returned by the GraphRAG `/query` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_path: Option<SearchPath>,
    #[serde(default, rename = "book_id", skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Rendered graph
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PulseIntensity {
    Low,
    Medium,
    High,
}

/// A node as currently displayed by the force-directed renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Graph stores may hand out numeric ids; they are kept as their decimal text.
    #[serde(deserialize_with = "node_id_text")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_node_size")]
    pub size: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub degree: u32,
    #[serde(default, rename = "centrality_score", alias = "centralityScore")]
    pub centrality_score: f64,

    // Overlay fields written by the highlight engine.
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub dimmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_importance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contextual_relevance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulse_intensity: Option<PulseIntensity>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn node_id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    NodeRef::deserialize(deserializer).map(|r| r.to_string())
}

fn default_node_size() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

impl GraphNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type: node_type.into(),
            color: String::new(),
            size: default_node_size(),
            visible: true,
            degree: 0,
            centrality_score: 0.0,
            highlighted: false,
            dimmed: false,
            search_order: None,
            search_score: None,
            semantic_score: None,
            reasoning_importance: None,
            contextual_relevance: None,
            pulse_intensity: None,
            extra: Map::new(),
        }
    }

    /// Drop every field the highlight overlay may have written, except the
    /// `highlighted`/`dimmed` flags which callers restore explicitly.
    pub(crate) fn clear_overlay(&mut self) {
        self.search_order = None;
        self.search_score = None;
        self.semantic_score = None;
        self.reasoning_importance = None;
        self.contextual_relevance = None;
        self.pulse_intensity = None;
    }
}

/// Scalar node reference as sent by the graph store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Text(s) => f.write_str(s),
            NodeRef::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Node object the renderer substitutes for a link endpoint once the
/// simulation has resolved it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineNode {
    pub id: NodeRef,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Link endpoint: either a bare id or the inline node object.
///
/// Anything else (`null`, an object without `id`, ...) is kept verbatim as
/// `Malformed` so one bad link cannot fail the whole document; such a link
/// references no node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkEndpoint {
    Ref(NodeRef),
    Inline(Box<InlineNode>),
    Malformed(Value),
}

impl Default for LinkEndpoint {
    fn default() -> Self {
        LinkEndpoint::Malformed(Value::Null)
    }
}

impl LinkEndpoint {
    /// Plain string id of the referenced node, whatever shape it arrived in.
    pub fn node_id(&self) -> Option<String> {
        match self {
            LinkEndpoint::Ref(r) => Some(r.to_string()),
            LinkEndpoint::Inline(node) => Some(node.id.to_string()),
            LinkEndpoint::Malformed(_) => None,
        }
    }
}

impl From<&str> for LinkEndpoint {
    fn from(id: &str) -> Self {
        LinkEndpoint::Ref(NodeRef::Text(id.to_string()))
    }
}

impl From<String> for LinkEndpoint {
    fn from(id: String) -> Self {
        LinkEndpoint::Ref(NodeRef::Text(id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLink {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub source: LinkEndpoint,
    #[serde(default)]
    pub target: LinkEndpoint,
    #[serde(default, alias = "type")]
    pub relation: String,
    #[serde(default = "default_link_weight")]
    pub weight: f64,

    // Overlay fields written by the highlight engine.
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub dimmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traversal_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_priority: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_dash_array: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub secondary: bool,
    #[serde(default)]
    pub contextual: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_link_weight() -> f64 {
    1.0
}

impl GraphLink {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<LinkEndpoint>,
        target: impl Into<LinkEndpoint>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            relation: relation.into(),
            weight: default_link_weight(),
            highlighted: false,
            dimmed: false,
            traversal_order: None,
            reasoning_priority: None,
            stroke_width: None,
            stroke_dash_array: None,
            animation_delay: None,
            opacity: None,
            secondary: false,
            contextual: false,
            extra: Map::new(),
        }
    }

    pub fn source_id(&self) -> Option<String> {
        self.source.node_id()
    }

    pub fn target_id(&self) -> Option<String> {
        self.target.node_id()
    }

    /// Stable key for snapshotting: the link id, or a synthetic key when the
    /// graph store did not assign one.
    pub fn key(&self) -> String {
        if self.id.is_empty() {
            format!(
                "{}->{}:{}",
                self.source_id().unwrap_or_default(),
                self.target_id().unwrap_or_default(),
                self.relation
            )
        } else {
            self.id.clone()
        }
    }

    pub(crate) fn clear_overlay(&mut self) {
        self.traversal_order = None;
        self.reasoning_priority = None;
        self.stroke_width = None;
        self.stroke_dash_array = None;
        self.animation_delay = None;
        self.opacity = None;
        self.secondary = false;
        self.contextual = false;
    }
}

/// Nodes and links as handed back to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_shapes_normalize_to_string_ids() {
        let link: GraphLink = serde_json::from_value(json!({
            "id": "l1",
            "source": {"id": "Paris", "x": 1.5, "y": -2.0},
            "target": 42,
            "relation": "LOCATED_IN"
        }))
        .unwrap();

        assert_eq!(link.source_id().as_deref(), Some("Paris"));
        assert_eq!(link.target_id().as_deref(), Some("42"));
        assert!(matches!(link.source, LinkEndpoint::Inline(_)));
    }

    #[test]
    fn malformed_endpoints_parse_and_reference_nothing() {
        let view: GraphView = serde_json::from_value(json!({
            "nodes": [{"id": "a"}],
            "links": [
                {"id": "ok", "source": "a", "target": "a"},
                {"id": "null", "source": null, "target": "a"},
                {"id": "nameless", "source": {"name": "x"}, "target": "a"},
                {"id": "missing", "target": "a"}
            ]
        }))
        .unwrap();

        assert_eq!(view.links[0].source_id().as_deref(), Some("a"));
        assert_eq!(view.links[1].source_id(), None);
        assert_eq!(view.links[2].source_id(), None);
        assert_eq!(view.links[3].source_id(), None);

        let back = serde_json::to_value(&view.links[2]).unwrap();
        assert_eq!(back["source"], json!({"name": "x"}));
        assert_eq!(serde_json::to_value(&view.links[1]).unwrap()["source"], Value::Null);
    }

    #[test]
    fn numeric_node_ids_become_text() {
        let view: GraphView = serde_json::from_value(json!({
            "nodes": [{"id": 1, "label": "One"}, {"id": "two"}],
            "links": [{"source": 1, "target": "two"}]
        }))
        .unwrap();

        assert_eq!(view.nodes[0].id, "1");
        assert_eq!(view.links[0].source_id().as_deref(), Some("1"));
        assert_eq!(view.links[0].key(), "1->two:");
    }

    #[test]
    fn link_key_falls_back_to_endpoints() {
        let link = GraphLink::new("", "a", "b", "KNOWS");
        assert_eq!(link.key(), "a->b:KNOWS");

        let link = GraphLink::new("rel-7", "a", "b", "KNOWS");
        assert_eq!(link.key(), "rel-7");
    }

    #[test]
    fn unknown_renderer_fields_survive_roundtrip() {
        let value = json!({
            "id": "Borges",
            "label": "Jorge Luis Borges",
            "type": "PERSON",
            "color": "#ff6b6b",
            "size": 7.0,
            "degree": 3,
            "centrality_score": 0.4,
            "x": 10.0,
            "fx": null
        });
        let node: GraphNode = serde_json::from_value(value).unwrap();
        assert_eq!(node.extra.get("x"), Some(&json!(10.0)));

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["x"], json!(10.0));
        assert_eq!(back["centrality_score"], json!(0.4));
        assert!(back.get("searchOrder").is_none());
    }

    #[test]
    fn query_response_carries_search_path() {
        let response: QueryResponse = serde_json::from_value(json!({
            "success": true,
            "answer": "...",
            "book_id": "ficciones",
            "searchPath": {
                "entities": [{"id": "Tlön", "type": "GEO", "order": 1, "rank": 1, "score": 1.0}],
                "relations": [{"source": "Tlön", "target": "Uqbar", "traversalOrder": 1, "weight": 1.0}],
                "communities": [{"id": "c0", "relevance": 0.8, "title": "Orbis Tertius"}]
            }
        }))
        .unwrap();

        let path = response.search_path.unwrap();
        assert_eq!(path.entities[0].entity_type.as_deref(), Some("GEO"));
        assert_eq!(path.relations[0].traversal_order, 1);
        assert_eq!(path.communities[0].extra["title"], json!("Orbis Tertius"));
        assert_eq!(response.book_id.as_deref(), Some("ficciones"));
    }
}
