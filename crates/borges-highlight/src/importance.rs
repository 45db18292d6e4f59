//! Reasoning importance (highlighted entities) and contextual relevance
//! (everything else).

use crate::config::HighlightConfig;
use crate::model::{GraphNode, SearchPathEntity};
use crate::similarity::similarity;
use crate::tokenize::tokenize;

const ORDER_WEIGHT: f64 = 0.4;
const SCORE_WEIGHT: f64 = 0.6;

const CENTRALITY_WEIGHT: f64 = 0.4;
const DEGREE_WEIGHT: f64 = 0.3;
const SEMANTIC_WEIGHT: f64 = 0.3;
const DEGREE_RELEVANCE_CAP: f64 = 0.3;
const SEMANTIC_RELEVANCE_SCALE: f64 = 0.4;

/// Blend of traversal rank, retrieval score and an early-position bonus, in `[0, 1]`.
///
/// Returns `None` for an empty search path.
pub fn reasoning_importance(
    entity: &SearchPathEntity,
    total_entities: usize,
    config: &HighlightConfig,
) -> Option<f64> {
    if total_entities == 0 {
        return None;
    }

    let order_importance = 1.0 - f64::from(entity.order) / total_entities as f64;
    let score_importance = entity.score.unwrap_or(0.0);
    let centrality_bonus = if total_entities > config.centrality_bonus_min_entities
        && entity.order <= config.centrality_bonus_max_order
    {
        config.centrality_bonus
    } else {
        0.0
    };

    let importance =
        order_importance * ORDER_WEIGHT + score_importance * SCORE_WEIGHT + centrality_bonus;
    Some(importance.clamp(0.0, 1.0))
}

/// Pre-tokenized ids of the entities that made it onto the graph.
#[derive(Debug, Clone, Default)]
pub struct MatchedEntityTokens {
    tokens: Vec<Vec<String>>,
}

impl MatchedEntityTokens {
    pub fn new<'a>(entity_ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            tokens: entity_ids.into_iter().map(tokenize).collect(),
        }
    }

    fn best_similarity(&self, node_tokens: &[String]) -> f64 {
        self.tokens
            .iter()
            .map(|t| similarity(node_tokens, t))
            .fold(0.0, f64::max)
    }
}

/// How much a non-highlighted node still matters around the reasoning trace,
/// capped at `config.contextual_relevance_cap`.
pub fn contextual_relevance(
    node: &GraphNode,
    matched: &MatchedEntityTokens,
    config: &HighlightConfig,
) -> f64 {
    let centrality_relevance = sanitize_unit(node.centrality_score);
    let degree_relevance = (f64::from(node.degree) / 10.0).min(DEGREE_RELEVANCE_CAP);
    let semantic_relevance = matched.best_similarity(&tokenize(&node.id)) * SEMANTIC_RELEVANCE_SCALE;

    let relevance = centrality_relevance * CENTRALITY_WEIGHT
        + degree_relevance * DEGREE_WEIGHT
        + semantic_relevance * SEMANTIC_WEIGHT;
    relevance.min(config.contextual_relevance_cap)
}

fn sanitize_unit(x: f64) -> f64 {
    if x.is_finite() {
        x.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
