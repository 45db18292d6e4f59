//! Borges Highlight: overlay a GraphRAG search path on a rendered knowledge graph.
//!
//! A GraphRAG answer comes with a *search path*: the ranked entities,
//! relations and communities the retriever walked through. The graph on screen
//! is loaded independently, with its own ids. This crate bridges the two:
//!
//! ```text
//!  SearchPath ──┐
//!               ├──► reconcile ──► importance ──┬──► encoding ──► decorated nodes
//!  nodes/links ─┘                               └──► classify ──► decorated links
//!
//!  HighlightEngine: snapshot ─► overlay ─► (clear) restore
//! ```
//!
//! - [`tokenize`] / [`similarity`]: fuzzy id/label comparison
//! - [`reconcile`]: search-path entity → graph node (exact first, then fuzzy)
//! - [`importance`]: reasoning importance and contextual relevance scores
//! - [`encoding`]: color/size/pulse/stroke from scores
//! - [`classify`]: primary / secondary / contextual / background links
//! - [`engine`]: the reversible highlight state machine
//!
//! Nothing here fails on bad input: unmatched entities, dangling relation
//! endpoints and empty graphs simply produce no highlight.

pub mod classify;
pub mod config;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod importance;
pub mod model;
pub mod reconcile;
pub mod similarity;
pub mod tokenize;

pub use classify::LinkClass;
pub use config::HighlightConfig;
pub use engine::{EngineState, HighlightEngine, HighlightStats, LinkClassCounts};
pub use error::{HighlightError, Result};
pub use model::{
    GraphLink, GraphNode, GraphView, LinkEndpoint, NodeRef, PulseIntensity, QueryResponse,
    SearchPath, SearchPathCommunity, SearchPathEntity, SearchPathRelation,
};
pub use reconcile::{reconcile, EntityMatch, MatchKind, Reconciliation};
pub use similarity::similarity;
pub use tokenize::tokenize;
