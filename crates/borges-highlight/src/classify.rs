//! Four-tier link classification relative to the highlighted node set.
//!
//! ```text
//! link ──┬── on a search-path relation ────────────► Primary
//!        ├── both endpoints highlighted ───────────► Secondary
//!        ├── exactly one endpoint highlighted ─────► Contextual
//!        └── neither ──────────────────────────────► Background
//! ```
//!
//! The tiers are checked in that order, so every link lands in exactly one.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::HighlightConfig;
use crate::encoding::primary_link_style;
use crate::model::{GraphLink, SearchPathRelation};
use crate::reconcile::Reconciliation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkClass {
    Primary,
    Secondary,
    Contextual,
    Background,
}

impl LinkClass {
    pub const ALL: [LinkClass; 4] = [
        LinkClass::Primary,
        LinkClass::Secondary,
        LinkClass::Contextual,
        LinkClass::Background,
    ];
}

/// Undirected lookup of search-path relations, keyed by endpoint pair.
///
/// Relations name their endpoints with search-path entity ids; each relation is
/// indexed both under those raw ids and under the node ids the entities were
/// reconciled to, so links drawn between rendered nodes still hit.
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    // (source, target) -> smallest traversal order seen for the pair
    orders: HashMap<(String, String), u32>,
    total_relations: usize,
}

impl RelationIndex {
    pub fn new(relations: &[SearchPathRelation], reconciliation: &Reconciliation) -> Self {
        let mut index = Self {
            orders: HashMap::new(),
            total_relations: relations.len(),
        };

        for rel in relations {
            index.insert(&rel.source, &rel.target, rel.traversal_order);

            let source = reconciliation.match_for_entity(&rel.source).map(|m| m.node_id.as_str());
            let target = reconciliation.match_for_entity(&rel.target).map(|m| m.node_id.as_str());
            let mapped_source = source.unwrap_or(rel.source.as_str());
            let mapped_target = target.unwrap_or(rel.target.as_str());
            if source.is_some() || target.is_some() {
                index.insert(mapped_source, mapped_target, rel.traversal_order);
            }
        }

        index
    }

    fn insert(&mut self, source: &str, target: &str, order: u32) {
        for key in [
            (source.to_string(), target.to_string()),
            (target.to_string(), source.to_string()),
        ] {
            self.orders
                .entry(key)
                .and_modify(|o| *o = (*o).min(order))
                .or_insert(order);
        }
    }

    /// Traversal order of the relation connecting `source` and `target`, in either direction.
    pub fn traversal_order(&self, source: &str, target: &str) -> Option<u32> {
        self.orders
            .get(&(source.to_string(), target.to_string()))
            .copied()
    }

    pub fn total_relations(&self) -> usize {
        self.total_relations
    }

    /// Earlier traversal ⇒ higher priority, in `[0, 1]`.
    pub fn reasoning_priority(&self, traversal_order: u32) -> f64 {
        if self.total_relations == 0 {
            return 0.0;
        }
        (1.0 - f64::from(traversal_order) / self.total_relations as f64).clamp(0.0, 1.0)
    }
}

/// Classification of one link, plus the traversal order for primary links.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classified {
    pub class: LinkClass,
    pub traversal_order: Option<u32>,
}

pub fn classify_link(
    link: &GraphLink,
    relations: &RelationIndex,
    highlighted: &HashSet<String>,
) -> Classified {
    let (Some(source), Some(target)) = (link.source_id(), link.target_id()) else {
        return Classified {
            class: LinkClass::Background,
            traversal_order: None,
        };
    };

    if let Some(order) = relations.traversal_order(&source, &target) {
        return Classified {
            class: LinkClass::Primary,
            traversal_order: Some(order),
        };
    }

    let class = match (highlighted.contains(&source), highlighted.contains(&target)) {
        (true, true) => LinkClass::Secondary,
        (true, false) | (false, true) => LinkClass::Contextual,
        (false, false) => LinkClass::Background,
    };
    Classified {
        class,
        traversal_order: None,
    }
}

/// Classify a link and return a decorated copy.
pub fn decorate_link(
    link: &GraphLink,
    relations: &RelationIndex,
    highlighted: &HashSet<String>,
    config: &HighlightConfig,
) -> (GraphLink, LinkClass) {
    let classified = classify_link(link, relations, highlighted);
    let mut out = link.clone();
    out.clear_overlay();

    match (classified.class, classified.traversal_order) {
        (LinkClass::Primary, Some(order)) => {
            let priority = relations.reasoning_priority(order);
            let style = primary_link_style(priority, order, config);
            out.highlighted = true;
            out.dimmed = false;
            out.traversal_order = Some(order);
            out.reasoning_priority = Some(priority);
            out.stroke_width = Some(style.stroke_width);
            out.stroke_dash_array = style.stroke_dash_array.map(str::to_string);
            out.animation_delay = Some(style.animation_delay);
            out.opacity = Some(1.0);
        }
        (LinkClass::Secondary, _) => {
            out.highlighted = true;
            out.dimmed = false;
            out.secondary = true;
            out.stroke_width = Some(1.5);
            out.opacity = Some(0.7);
        }
        (LinkClass::Contextual, _) => {
            out.highlighted = false;
            out.dimmed = false;
            out.contextual = true;
            out.stroke_width = Some(1.0);
            out.opacity = Some(0.4);
        }
        _ => {
            out.highlighted = false;
            out.dimmed = true;
            out.stroke_width = Some(0.5);
            out.opacity = Some(0.1);
        }
    }

    (out, classified.class)
}
