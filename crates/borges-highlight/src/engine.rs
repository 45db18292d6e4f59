//! Reversible highlight overlay.
//!
//! ```text
//!            highlight_search_path            clear_highlight
//!   Clean ───────────────────────► Highlighted ───────────────► Clean
//!                                   │      ▲
//!                                   └──────┘ highlight_search_path
//!                                   (re-snapshots the current view)
//! ```
//!
//! Both transforms take the currently displayed nodes/links by reference and
//! return decorated copies; the inputs are never mutated. The engine keeps the
//! pre-highlight visual fields (`color`, `size`, `highlighted`, `dimmed` and any
//! overlay fields already on screen) so the overlay can be undone.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::{decorate_link, LinkClass, RelationIndex};
use crate::config::HighlightConfig;
use crate::encoding::{dimmed_color, node_color, node_size, pulse_intensity, EntityCategory, Rgb};
use crate::importance::{contextual_relevance, reasoning_importance, MatchedEntityTokens};
use crate::model::{GraphLink, GraphNode, GraphView, PulseIntensity, SearchPath, SearchPathEntity};
use crate::reconcile::{reconcile, EntityMatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Clean,
    Highlighted,
}

#[derive(Debug, Clone, PartialEq)]
struct NodeVisual {
    color: String,
    size: f64,
    highlighted: bool,
    dimmed: bool,
    search_order: Option<u32>,
    search_score: Option<f64>,
    semantic_score: Option<f64>,
    reasoning_importance: Option<f64>,
    contextual_relevance: Option<f64>,
    pulse_intensity: Option<PulseIntensity>,
}

impl NodeVisual {
    fn capture(node: &GraphNode) -> Self {
        Self {
            color: node.color.clone(),
            size: node.size,
            highlighted: node.highlighted,
            dimmed: node.dimmed,
            search_order: node.search_order,
            search_score: node.search_score,
            semantic_score: node.semantic_score,
            reasoning_importance: node.reasoning_importance,
            contextual_relevance: node.contextual_relevance,
            pulse_intensity: node.pulse_intensity,
        }
    }

    fn restore(&self, node: &mut GraphNode) {
        node.color = self.color.clone();
        node.size = self.size;
        node.highlighted = self.highlighted;
        node.dimmed = self.dimmed;
        node.search_order = self.search_order;
        node.search_score = self.search_score;
        node.semantic_score = self.semantic_score;
        node.reasoning_importance = self.reasoning_importance;
        node.contextual_relevance = self.contextual_relevance;
        node.pulse_intensity = self.pulse_intensity;
    }
}

#[derive(Debug, Clone, PartialEq)]
struct LinkVisual {
    highlighted: bool,
    dimmed: bool,
    traversal_order: Option<u32>,
    reasoning_priority: Option<f64>,
    stroke_width: Option<f64>,
    stroke_dash_array: Option<String>,
    animation_delay: Option<f64>,
    opacity: Option<f64>,
    secondary: bool,
    contextual: bool,
}

impl LinkVisual {
    fn capture(link: &GraphLink) -> Self {
        Self {
            highlighted: link.highlighted,
            dimmed: link.dimmed,
            traversal_order: link.traversal_order,
            reasoning_priority: link.reasoning_priority,
            stroke_width: link.stroke_width,
            stroke_dash_array: link.stroke_dash_array.clone(),
            animation_delay: link.animation_delay,
            opacity: link.opacity,
            secondary: link.secondary,
            contextual: link.contextual,
        }
    }

    fn restore(&self, link: &mut GraphLink) {
        link.highlighted = self.highlighted;
        link.dimmed = self.dimmed;
        link.traversal_order = self.traversal_order;
        link.reasoning_priority = self.reasoning_priority;
        link.stroke_width = self.stroke_width;
        link.stroke_dash_array = self.stroke_dash_array.clone();
        link.animation_delay = self.animation_delay;
        link.opacity = self.opacity;
        link.secondary = self.secondary;
        link.contextual = self.contextual;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkClassCounts {
    pub primary: usize,
    pub secondary: usize,
    pub contextual: usize,
    pub background: usize,
}

impl LinkClassCounts {
    fn record(&mut self, class: LinkClass) {
        match class {
            LinkClass::Primary => self.primary += 1,
            LinkClass::Secondary => self.secondary += 1,
            LinkClass::Contextual => self.contextual += 1,
            LinkClass::Background => self.background += 1,
        }
    }

    pub fn get(&self, class: LinkClass) -> usize {
        match class {
            LinkClass::Primary => self.primary,
            LinkClass::Secondary => self.secondary,
            LinkClass::Contextual => self.contextual,
            LinkClass::Background => self.background,
        }
    }

    pub fn total(&self) -> usize {
        self.primary + self.secondary + self.contextual + self.background
    }
}

/// Diagnostics snapshot of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightStats {
    pub state: EngineState,
    pub highlighted_nodes: usize,
    pub highlighted_links: usize,
    pub tracked_nodes: usize,
    pub tracked_links: usize,
    pub link_classes: LinkClassCounts,
}

#[derive(Debug, Clone)]
pub struct HighlightEngine {
    config: HighlightConfig,
    node_snapshot: HashMap<String, NodeVisual>,
    link_snapshot: HashMap<String, LinkVisual>,
    highlighted_nodes: HashSet<String>,
    highlighted_links: HashSet<String>,
    link_classes: LinkClassCounts,
    state: EngineState,
}

impl Default for HighlightEngine {
    fn default() -> Self {
        Self::new(HighlightConfig::default())
    }
}

impl HighlightEngine {
    pub fn new(config: HighlightConfig) -> Self {
        Self {
            config,
            node_snapshot: HashMap::new(),
            link_snapshot: HashMap::new(),
            highlighted_nodes: HashSet::new(),
            highlighted_links: HashSet::new(),
            link_classes: LinkClassCounts::default(),
            state: EngineState::Clean,
        }
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Overlay `path` on the displayed graph.
    ///
    /// The snapshot is retaken from `nodes`/`links` on every call, so calling
    /// this again while highlighted composes on top of what is on screen.
    pub fn highlight_search_path(
        &mut self,
        nodes: &[GraphNode],
        links: &[GraphLink],
        path: &SearchPath,
    ) -> GraphView {
        self.reset();
        self.take_snapshot(nodes, links);

        let reconciliation = reconcile(&path.entities, nodes, self.config.match_threshold);
        self.highlighted_nodes = reconciliation.matched_node_ids().map(str::to_string).collect();

        let matched_tokens = MatchedEntityTokens::new(
            reconciliation
                .matches()
                .iter()
                .map(|m| m.entity_id.as_str()),
        );

        let out_nodes: Vec<GraphNode> = nodes
            .iter()
            .map(|node| match reconciliation.entity_for_node(&node.id) {
                Some(m) => self.highlight_node(node, m, &path.entities),
                None => self.dim_node(node, &matched_tokens),
            })
            .collect();

        let relations = RelationIndex::new(&path.relations, &reconciliation);
        let out_links: Vec<GraphLink> = links
            .iter()
            .map(|link| {
                let (decorated, class) =
                    decorate_link(link, &relations, &self.highlighted_nodes, &self.config);
                self.link_classes.record(class);
                if decorated.highlighted {
                    self.highlighted_links.insert(decorated.key());
                }
                decorated
            })
            .collect();

        self.state = EngineState::Highlighted;
        info!(
            entities = path.entities.len(),
            relations = path.relations.len(),
            matched = reconciliation.len(),
            highlighted_nodes = self.highlighted_nodes.len(),
            primary_links = self.link_classes.primary,
            secondary_links = self.link_classes.secondary,
            "search path highlighted"
        );

        GraphView {
            nodes: out_nodes,
            links: out_links,
        }
    }

    /// Undo the overlay on the displayed graph and forget all tracking state.
    ///
    /// Snapshotted elements get back exactly what they showed before the last
    /// highlight. Elements missing from the snapshot (added after the
    /// highlight, or no highlight at all) lose every overlay field and come
    /// back as neither highlighted nor dimmed.
    pub fn clear_highlight(&mut self, nodes: &[GraphNode], links: &[GraphLink]) -> GraphView {
        let out_nodes = nodes
            .iter()
            .map(|node| {
                let mut out = node.clone();
                match self.node_snapshot.get(&node.id) {
                    Some(saved) => saved.restore(&mut out),
                    None => {
                        out.clear_overlay();
                        out.highlighted = false;
                        out.dimmed = false;
                    }
                }
                out
            })
            .collect();

        let out_links = links
            .iter()
            .map(|link| {
                let mut out = link.clone();
                match self.link_snapshot.get(&link.key()) {
                    Some(saved) => saved.restore(&mut out),
                    None => {
                        out.clear_overlay();
                        out.highlighted = false;
                        out.dimmed = false;
                    }
                }
                out
            })
            .collect();

        info!(
            restored_nodes = self.node_snapshot.len(),
            restored_links = self.link_snapshot.len(),
            "highlight cleared"
        );
        self.reset();

        GraphView {
            nodes: out_nodes,
            links: out_links,
        }
    }

    pub fn stats(&self) -> HighlightStats {
        HighlightStats {
            state: self.state,
            highlighted_nodes: self.highlighted_nodes.len(),
            highlighted_links: self.highlighted_links.len(),
            tracked_nodes: self.node_snapshot.len(),
            tracked_links: self.link_snapshot.len(),
            link_classes: self.link_classes,
        }
    }

    fn reset(&mut self) {
        self.node_snapshot.clear();
        self.link_snapshot.clear();
        self.highlighted_nodes.clear();
        self.highlighted_links.clear();
        self.link_classes = LinkClassCounts::default();
        self.state = EngineState::Clean;
    }

    fn take_snapshot(&mut self, nodes: &[GraphNode], links: &[GraphLink]) {
        for node in nodes {
            self.node_snapshot
                .entry(node.id.clone())
                .or_insert_with(|| NodeVisual::capture(node));
        }
        for link in links {
            self.link_snapshot
                .entry(link.key())
                .or_insert_with(|| LinkVisual::capture(link));
        }
    }

    fn highlight_node(
        &self,
        node: &GraphNode,
        m: &EntityMatch,
        entities: &[SearchPathEntity],
    ) -> GraphNode {
        let entity = &entities[m.entity_index];
        // `entities` is non-empty here: `m` came from it.
        let importance = reasoning_importance(entity, entities.len(), &self.config).unwrap_or(0.0);
        let score = entity.score.unwrap_or(0.0);
        let intelligence = score * m.semantic_score;

        let entity_type = entity.entity_type.as_deref().unwrap_or(&node.node_type);
        let color = node_color(entity_type, intelligence, importance, &self.config);
        debug!(
            node = %node.id,
            entity = %entity.id,
            importance,
            intelligence,
            %color,
            "node highlighted"
        );

        let mut out = node.clone();
        out.clear_overlay();
        out.highlighted = true;
        out.dimmed = false;
        out.search_order = Some(entity.order);
        out.search_score = entity.score;
        out.semantic_score = Some(m.semantic_score);
        out.reasoning_importance = Some(importance);
        out.pulse_intensity = Some(pulse_intensity(importance, &self.config));
        out.color = color.to_string();
        out.size = node_size(node.size, intelligence, importance, &self.config);
        out
    }

    fn dim_node(&self, node: &GraphNode, matched: &MatchedEntityTokens) -> GraphNode {
        let relevance = contextual_relevance(node, matched, &self.config);
        let current = Rgb::parse_css(&node.color)
            .unwrap_or_else(|| EntityCategory::from_type(&node.node_type).base_color());

        let mut out = node.clone();
        out.clear_overlay();
        out.highlighted = false;
        out.dimmed = true;
        out.contextual_relevance = Some(relevance);
        out.color = dimmed_color(current, relevance).to_string();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PulseIntensity, SearchPathRelation};

    fn graph() -> (Vec<GraphNode>, Vec<GraphLink>) {
        let mut borges = GraphNode::new("borges", "Jorge Luis Borges", "PERSON");
        borges.color = "#ff6b6b".to_string();
        borges.size = 10.0;
        let mut aleph = GraphNode::new("aleph", "The Aleph", "WORK");
        aleph.color = "#2ecc71".to_string();
        let mut buenos_aires = GraphNode::new("buenos aires", "Buenos Aires", "GEO");
        buenos_aires.color = "#4ecdc4".to_string();
        let nodes = vec![borges, aleph, buenos_aires];
        let links = vec![
            GraphLink::new("l1", "borges", "aleph", "WROTE"),
            GraphLink::new("l2", "aleph", "buenos aires", "SET_IN"),
        ];
        (nodes, links)
    }

    fn path() -> SearchPath {
        SearchPath {
            entities: vec![SearchPathEntity::new("borges", 1.0, 1).with_type("PERSON")],
            relations: vec![],
            communities: vec![],
        }
    }

    #[test]
    fn starts_clean() {
        let engine = HighlightEngine::default();
        let stats = engine.stats();
        assert_eq!(stats.state, EngineState::Clean);
        assert_eq!(stats.tracked_nodes, 0);
    }

    #[test]
    fn highlight_decorates_matched_node_and_dims_the_rest() {
        let (nodes, links) = graph();
        let mut engine = HighlightEngine::default();
        let view = engine.highlight_search_path(&nodes, &links, &path());

        let borges = &view.nodes[0];
        assert!(borges.highlighted);
        assert!(!borges.dimmed);
        assert_eq!(borges.search_order, Some(1));
        assert_eq!(borges.semantic_score, Some(1.0));
        // importance = 0*0.4 + 1*0.6 = 0.6
        assert_eq!(borges.pulse_intensity, Some(PulseIntensity::Medium));

        assert!(view.nodes[1].dimmed);
        assert!(view.nodes[1].contextual_relevance.is_some());
        assert!(view.nodes[1].search_order.is_none());

        // Input untouched.
        assert!(!nodes[0].highlighted);
        assert_eq!(nodes[0].color, "#ff6b6b");
    }

    #[test]
    fn stats_track_highlighted_elements() {
        let (nodes, links) = graph();
        let mut engine = HighlightEngine::default();
        engine.highlight_search_path(&nodes, &links, &path());

        let stats = engine.stats();
        assert_eq!(stats.state, EngineState::Highlighted);
        assert_eq!(stats.highlighted_nodes, 1);
        assert_eq!(stats.highlighted_links, 0);
        assert_eq!(stats.tracked_nodes, 3);
        assert_eq!(stats.tracked_links, 2);
        assert_eq!(stats.link_classes.contextual, 1);
        assert_eq!(stats.link_classes.background, 1);
    }

    #[test]
    fn clear_restores_and_resets() {
        let (nodes, links) = graph();
        let mut engine = HighlightEngine::default();
        let view = engine.highlight_search_path(&nodes, &links, &path());
        let cleared = engine.clear_highlight(&view.nodes, &view.links);

        assert_eq!(cleared.nodes, nodes);
        assert_eq!(cleared.links, links);
        assert_eq!(engine.stats().state, EngineState::Clean);
        assert_eq!(engine.stats().tracked_nodes, 0);
    }

    #[test]
    fn relation_between_highlighted_entities_is_primary() {
        let (nodes, links) = graph();
        let path = SearchPath {
            entities: vec![
                SearchPathEntity::new("borges", 1.0, 1),
                SearchPathEntity::new("aleph", 0.9, 2),
            ],
            relations: vec![SearchPathRelation::new("aleph", "borges", 1)],
            communities: vec![],
        };
        let mut engine = HighlightEngine::default();
        let view = engine.highlight_search_path(&nodes, &links, &path);

        assert!(view.links[0].highlighted);
        assert_eq!(view.links[0].traversal_order, Some(1));
        assert_eq!(engine.stats().link_classes.primary, 1);
        assert_eq!(engine.stats().highlighted_links, 1);
    }
}
