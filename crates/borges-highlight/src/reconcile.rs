//! Entity reconciliation: search-path entity ids → rendered graph nodes.
//!
//! The GraphRAG index and the rendered graph are sourced independently, so an
//! entity called `"JORGE LUIS BORGES"` in the search path may be node
//! `"jorge_luis_borges"` (label `"Jorge Luis Borges"`) on screen.
//!
//! Strategy, per entity in search-path order:
//!
//! 1. exact id equality (semantic score 1.0, first node wins),
//! 2. otherwise the best fuzzy score over *all* nodes, comparing the entity's
//!    id tokens against each node's id and label tokens,
//! 3. accept the fuzzy candidate only if it scores strictly above the threshold.
//!
//! Ties during the fuzzy scan keep the first node (in input order) that reached
//! the maximum score.

use std::collections::HashMap;

use tracing::debug;

use crate::model::{GraphNode, SearchPathEntity};
use crate::similarity::similarity;
use crate::tokenize::tokenize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityMatch {
    /// Index into the search path's entity list.
    pub entity_index: usize,
    pub entity_id: String,
    /// Index into the node slice that was reconciled against.
    pub node_index: usize,
    pub node_id: String,
    pub semantic_score: f64,
    pub kind: MatchKind,
}

/// Result of reconciling one search path against one node set.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    matches: Vec<EntityMatch>,
    by_entity: HashMap<String, usize>,
    by_node: HashMap<String, usize>,
}

impl Reconciliation {
    fn push(&mut self, m: EntityMatch) {
        let idx = self.matches.len();
        // Earlier entities keep their claim when ids or nodes repeat.
        self.by_entity.entry(m.entity_id.clone()).or_insert(idx);
        self.by_node.entry(m.node_id.clone()).or_insert(idx);
        self.matches.push(m);
    }

    /// Every accepted match, in search-path order.
    pub fn matches(&self) -> &[EntityMatch] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn match_for_entity(&self, entity_id: &str) -> Option<&EntityMatch> {
        self.by_entity.get(entity_id).map(|&i| &self.matches[i])
    }

    pub fn semantic_score(&self, entity_id: &str) -> Option<f64> {
        self.match_for_entity(entity_id).map(|m| m.semantic_score)
    }

    /// The entity a node is attributed to. A node claimed by several entities
    /// belongs to the earliest one in the search path.
    pub fn entity_for_node(&self, node_id: &str) -> Option<&EntityMatch> {
        self.by_node.get(node_id).map(|&i| &self.matches[i])
    }

    pub fn is_node_matched(&self, node_id: &str) -> bool {
        self.by_node.contains_key(node_id)
    }

    /// Ids of nodes attributed to some entity (each node once).
    pub fn matched_node_ids(&self) -> impl Iterator<Item = &str> {
        self.by_node.keys().map(String::as_str)
    }

    /// Semantic scores keyed by entity id.
    pub fn semantic_scores(&self) -> HashMap<String, f64> {
        self.by_entity
            .iter()
            .map(|(id, &i)| (id.clone(), self.matches[i].semantic_score))
            .collect()
    }
}

struct NodeTokens {
    id: Vec<String>,
    label: Vec<String>,
}

pub fn reconcile(
    entities: &[SearchPathEntity],
    nodes: &[GraphNode],
    threshold: f64,
) -> Reconciliation {
    let mut out = Reconciliation::default();
    if entities.is_empty() || nodes.is_empty() {
        return out;
    }

    // Tokenized lazily: a path made only of exact hits never needs it.
    let mut node_tokens: Option<Vec<NodeTokens>> = None;

    for (entity_index, entity) in entities.iter().enumerate() {
        if let Some(node_index) = nodes.iter().position(|n| n.id == entity.id) {
            debug!(entity = %entity.id, node = %nodes[node_index].id, "exact entity match");
            out.push(EntityMatch {
                entity_index,
                entity_id: entity.id.clone(),
                node_index,
                node_id: nodes[node_index].id.clone(),
                semantic_score: 1.0,
                kind: MatchKind::Exact,
            });
            continue;
        }

        let entity_tokens = tokenize(&entity.id);
        let candidates = node_tokens.get_or_insert_with(|| {
            nodes
                .iter()
                .map(|n| NodeTokens {
                    id: tokenize(&n.id),
                    label: tokenize(&n.label),
                })
                .collect()
        });

        let mut best: Option<usize> = None;
        let mut best_score = 0.0_f64;
        for (node_index, tokens) in candidates.iter().enumerate() {
            let score = similarity(&entity_tokens, &tokens.id)
                .max(similarity(&entity_tokens, &tokens.label));
            if score > best_score {
                best_score = score;
                best = Some(node_index);
            }
        }

        match best {
            Some(node_index) if best_score > threshold => {
                debug!(
                    entity = %entity.id,
                    node = %nodes[node_index].id,
                    score = best_score,
                    "fuzzy entity match"
                );
                out.push(EntityMatch {
                    entity_index,
                    entity_id: entity.id.clone(),
                    node_index,
                    node_id: nodes[node_index].id.clone(),
                    semantic_score: best_score,
                    kind: MatchKind::Fuzzy,
                });
            }
            _ => {
                debug!(entity = %entity.id, best_score, "entity left unmatched");
            }
        }
    }

    out
}
