//! Borges CLI
//!
//! Offline tooling around the search-path highlight engine:
//! - Apply a GraphRAG search path to a saved graph view (`highlight`)
//! - Inspect how search-path entities map onto graph nodes (`reconcile`)
//! - Summarize link classes for a search path (`classify`)
//! - Turn saved graph-store API responses into a graph view (`import-neo4j`)

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::Level;

use borges_highlight::{reconcile, HighlightEngine};

mod graph_io;
mod neo4j;
mod report;

#[derive(Parser)]
#[command(name = "borges")]
#[command(author, version, about = "Borges: GraphRAG search-path highlighting for knowledge graphs")]
struct Cli {
    /// Log reconciliation decisions (debug level)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by every command that runs a search path against a graph.
#[derive(Args)]
struct HighlightInput {
    /// Graph view JSON (`{nodes, links}`); `-` reads stdin
    #[arg(short, long)]
    graph: PathBuf,
    /// Search path JSON, bare or wrapped in the `/query` response
    #[arg(short, long)]
    search_path: PathBuf,
    /// Tuning overrides (JSON); missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Highlight a search path on a graph view and write the decorated graph.
    Highlight {
        #[command(flatten)]
        input: HighlightInput,
        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        /// Highlight, then clear, and write the restored graph (sanity check).
        #[arg(long)]
        roundtrip: bool,
    },

    /// Show which graph node each search-path entity resolves to.
    Reconcile {
        #[command(flatten)]
        input: HighlightInput,
    },

    /// Count primary/secondary/contextual/background links for a search path.
    Classify {
        #[command(flatten)]
        input: HighlightInput,
        /// Print stats as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Convert saved graph-store `/nodes` + `/relationships` responses into a graph view.
    #[command(name = "import-neo4j")]
    ImportNeo4j {
        /// `/nodes` response JSON
        #[arg(long)]
        nodes: PathBuf,
        /// `/relationships` response JSON
        #[arg(long)]
        relationships: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Highlight {
            input,
            out,
            pretty,
            roundtrip,
        } => cmd_highlight(&input, out.as_deref(), pretty, roundtrip),
        Commands::Reconcile { input } => cmd_reconcile(&input),
        Commands::Classify { input, json } => cmd_classify(&input, json),
        Commands::ImportNeo4j {
            nodes,
            relationships,
            out,
            pretty,
        } => cmd_import_neo4j(&nodes, &relationships, out.as_deref(), pretty),
    }
}

fn cmd_highlight(
    input: &HighlightInput,
    out: Option<&Path>,
    pretty: bool,
    roundtrip: bool,
) -> Result<()> {
    let config = graph_io::load_config(input.config.as_deref())?;
    let graph = graph_io::load_graph(&input.graph)?;
    let path = graph_io::load_search_path(&input.search_path)?;

    let mut engine = HighlightEngine::new(config);
    let mut view = engine.highlight_search_path(&graph.nodes, &graph.links, &path);
    if roundtrip {
        view = engine.clear_highlight(&view.nodes, &view.links);
    }

    graph_io::write_json(out, &view, pretty)?;
    if let Some(out) = out {
        eprintln!("{} {}", "wrote".green().bold(), out.display().to_string().bold());
    }
    Ok(())
}

fn cmd_reconcile(input: &HighlightInput) -> Result<()> {
    let config = graph_io::load_config(input.config.as_deref())?;
    let graph = graph_io::load_graph(&input.graph)?;
    let path = graph_io::load_search_path(&input.search_path)?;

    let reconciliation = reconcile(&path.entities, &graph.nodes, config.match_threshold);
    print!(
        "{}",
        report::reconciliation_report(&path, &graph.nodes, &reconciliation, &config)
    );
    Ok(())
}

fn cmd_classify(input: &HighlightInput, json: bool) -> Result<()> {
    let config = graph_io::load_config(input.config.as_deref())?;
    let graph = graph_io::load_graph(&input.graph)?;
    let path = graph_io::load_search_path(&input.search_path)?;

    let mut engine = HighlightEngine::new(config);
    engine.highlight_search_path(&graph.nodes, &graph.links, &path);
    let stats = engine.stats();

    if json {
        graph_io::write_json(None, &stats, true)?;
    } else {
        print!("{}", report::classification_report(&stats));
    }
    Ok(())
}

fn cmd_import_neo4j(
    nodes: &Path,
    relationships: &Path,
    out: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let nodes_payload: neo4j::NodesPayload = serde_json::from_str(&graph_io::read_input(nodes)?)?;
    let rels_payload: neo4j::RelationshipsPayload =
        serde_json::from_str(&graph_io::read_input(relationships)?)?;

    let view = neo4j::graph_from_store(&nodes_payload, &rels_payload);
    eprintln!(
        "{} imported {} nodes, {} links",
        "ok".green().bold(),
        view.nodes.len(),
        view.links.len()
    );
    graph_io::write_json(out, &view, pretty)
}
