//! Human-readable reports for `borges reconcile` and `borges classify`.

use colored::Colorize;
use std::fmt::Write as _;

use borges_highlight::importance::reasoning_importance;
use borges_highlight::{
    GraphNode, HighlightConfig, HighlightStats, LinkClass, MatchKind, Reconciliation, SearchPath,
};

pub fn reconciliation_report(
    path: &SearchPath,
    nodes: &[GraphNode],
    reconciliation: &Reconciliation,
    config: &HighlightConfig,
) -> String {
    let mut out = String::new();
    let total = path.entities.len();
    let _ = writeln!(
        out,
        "{} {} of {} entities matched against {} nodes",
        "reconcile:".bold(),
        reconciliation.len(),
        total,
        nodes.len()
    );

    for entity in &path.entities {
        let order = format!("#{:<3}", entity.order).dimmed();
        match reconciliation.match_for_entity(&entity.id) {
            Some(m) => {
                let kind = match m.kind {
                    MatchKind::Exact => "exact".green(),
                    MatchKind::Fuzzy => "fuzzy".yellow(),
                };
                let importance = reasoning_importance(entity, total, config).unwrap_or(0.0);
                let _ = writeln!(
                    out,
                    "  {order} {} → {} [{kind} {:.3}] importance={:.3}",
                    entity.id.bold(),
                    nodes[m.node_index].label,
                    m.semantic_score,
                    importance
                );
            }
            None => {
                let _ = writeln!(out, "  {order} {} → {}", entity.id.bold(), "unmatched".red());
            }
        }
    }
    out
}

pub fn classification_report(stats: &HighlightStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} nodes highlighted, {} links highlighted",
        "classify:".bold(),
        stats.highlighted_nodes,
        stats.highlighted_links
    );
    for class in LinkClass::ALL {
        let label = match class {
            LinkClass::Primary => "primary".green(),
            LinkClass::Secondary => "secondary".cyan(),
            LinkClass::Contextual => "contextual".yellow(),
            LinkClass::Background => "background".dimmed(),
        };
        let _ = writeln!(out, "  {:<12} {}", label, stats.link_classes.get(class));
    }
    out
}
