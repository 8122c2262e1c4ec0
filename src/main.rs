use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;

use kg_query::config::{AppConfig, AppState};
use kg_query::embedding::{EmbeddingService, HashEmbedder};
use kg_query::service::{GraphService, SearchService};
use kg_query::storage::GraphSnapshot;
use kg_query::types::{NodeType, Page};

#[derive(Parser)]
#[command(name = "kg-query")]
#[command(about = "Structural and relevance queries over a knowledge graph snapshot")]
struct Cli {
    #[arg(long, env, default_value_os_t = default_data_dir())]
    data_dir: PathBuf,

    /// Graph snapshot to load. Defaults to graph.json in the data dir.
    #[arg(long, env = "GRAPH_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    #[arg(long, env = "FTS_WEIGHT", default_value = "0.5")]
    fts_weight: f64,

    #[arg(long, env = "VECTOR_WEIGHT", default_value = "0.5")]
    vector_weight: f64,

    #[arg(long, env = "VECTOR_THRESHOLD", default_value = "0.7")]
    vector_threshold: f32,

    #[arg(long, env = "VECTOR_K", default_value = "10")]
    vector_k: usize,

    #[arg(long, env = "TIMEOUT_MS", default_value = "30000")]
    timeout: u64,

    #[arg(long, env, default_value = "1000")]
    cache_size: usize,

    #[arg(long, env, default_value = "256")]
    dimensions: usize,

    /// Cached neighborhoods kept in memory
    #[arg(long, env, default_value = "1000")]
    neighborhood_cache_size: u64,

    /// Seconds a cached neighborhood stays valid
    #[arg(long, env, default_value = "300")]
    neighborhood_cache_ttl: u64,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Nodes and edges within N hops of a node
    Neighborhood {
        id: String,
        #[arg(long, default_value = "2")]
        hops: u32,
    },
    /// Shortest undirected path between two nodes
    Path {
        from: String,
        to: String,
        #[arg(long)]
        max_hops: Option<usize>,
    },
    /// Connected component containing a node
    Component { id: String },
    /// Degree centrality for a set of nodes
    Centrality {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Subgraph induced by a set of nodes
    Subgraph {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Whole-graph counts and distributions
    Stats,
    /// Keyword search
    Search {
        query: String,
        #[arg(long = "type")]
        node_type: Option<NodeType>,
        #[arg(long)]
        highlight: bool,
        #[arg(long, default_value = "0")]
        page: usize,
        #[arg(long, default_value = "10")]
        size: usize,
    },
    /// Vector similarity search
    Vector {
        query: String,
        #[arg(long)]
        threshold: Option<f32>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Nodes similar to an existing node
    Similar {
        id: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Fused keyword and vector search
    Hybrid {
        query: String,
        #[arg(long)]
        fts_weight: Option<f64>,
        #[arg(long)]
        vector_weight: Option<f64>,
        #[arg(long, default_value = "0")]
        page: usize,
        #[arg(long, default_value = "10")]
        size: usize,
    },
    /// Fused search with weights chosen from probe quality
    Adaptive {
        query: String,
        #[arg(long, default_value = "0")]
        page: usize,
        #[arg(long, default_value = "10")]
        size: usize,
    },
    /// Alternative phrasings of a query
    Suggest { query: String },
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kg-query")
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn app_config(cli: &Cli) -> AppConfig {
    AppConfig {
        data_dir: cli.data_dir.clone(),
        default_fts_weight: cli.fts_weight,
        default_vector_weight: cli.vector_weight,
        vector_threshold: cli.vector_threshold,
        vector_k: cli.vector_k,
        timeout_ms: cli.timeout,
        embedding_cache_size: cli.cache_size,
        embedding_dimensions: cli.dimensions,
        neighborhood_cache_size: cli.neighborhood_cache_size,
        neighborhood_cache_ttl_secs: cli.neighborhood_cache_ttl,
        log_level: cli.log_level.clone(),
        ..AppConfig::default()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = app_config(&cli);

    let snapshot_path = cli.snapshot.unwrap_or_else(|| config.snapshot_path());
    tracing::info!(path = %snapshot_path.display(), "Loading graph snapshot");

    let embedder = Arc::new(EmbeddingService::new(
        Arc::new(HashEmbedder::new(config.embedding_dimensions)),
        config.embedding_cache_size,
    ));
    let loaded = GraphSnapshot::from_path(&snapshot_path)
        .with_context(|| format!("reading snapshot {}", snapshot_path.display()))?
        .load(embedder.as_ref())
        .await?;

    let state = AppState {
        config,
        store: Arc::new(loaded.graph),
        text_index: Arc::new(loaded.text_index),
        vector_index: Arc::new(loaded.vector_index),
        embedder: embedder.clone(),
    };
    let graph = GraphService::from_state(&state);
    let search = SearchService::new(&state);

    match cli.command {
        Command::Neighborhood { id, hops } => print_json(&graph.get_neighborhood(&id, hops).await?)?,
        Command::Path { from, to, max_hops } => {
            print_json(&graph.find_shortest_path(&from, &to, max_hops).await?)?
        }
        Command::Component { id } => print_json(&graph.get_connected_component(&id).await?)?,
        Command::Centrality { ids } => print_json(&graph.calculate_centrality(&ids).await?)?,
        Command::Subgraph { ids } => print_json(&graph.extract_subgraph(&ids).await?)?,
        Command::Stats => print_json(&graph.graph_statistics().await?)?,
        Command::Search {
            query,
            node_type,
            highlight,
            page,
            size,
        } => print_json(
            &search
                .search(&query, node_type, Page::of(page, size), highlight)
                .await?,
        )?,
        Command::Vector {
            query,
            threshold,
            limit,
        } => print_json(&search.vector_search(&query, threshold, limit).await?)?,
        Command::Similar { id, limit } => print_json(&search.similar_nodes(&id, limit).await?)?,
        Command::Hybrid {
            query,
            fts_weight,
            vector_weight,
            page,
            size,
        } => print_json(
            &search
                .hybrid_search(&query, fts_weight, vector_weight, Page::of(page, size))
                .await?,
        )?,
        Command::Adaptive { query, page, size } => print_json(
            &search
                .adaptive_hybrid_search(&query, Page::of(page, size))
                .await?,
        )?,
        Command::Suggest { query } => print_json(&search.suggest(&query)?)?,
    }

    let stats = embedder.cache_stats();
    tracing::debug!(hits = stats.hits, misses = stats.misses, "Embedding cache");
    Ok(())
}
