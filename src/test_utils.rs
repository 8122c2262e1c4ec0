use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tempfile::TempDir;

use crate::config::{AppConfig, AppState};
use crate::embedding::{EmbeddingService, HashEmbedder};
use crate::storage::{
    Embedder, FullTextIndex, GraphSnapshot, InMemoryGraph, VectorIndex,
};
use crate::types::{
    AppError, Edge, EdgeType, Node, NodeType, Page, SearchPage, SearchResult,
};
use crate::Result;

/// A -[AFFILIATED_WITH]-> B, A -[PARTICIPATED_IN]-> C, B -[PART_OF]-> D,
/// plus an isolated node.
pub fn sample_snapshot() -> GraphSnapshot {
    GraphSnapshot {
        nodes: vec![
            Node::new("a", NodeType::Person, "Ada Lovelace")
                .with_property("field", json!("mathematics")),
            Node::new("b", NodeType::Organization, "Analytical Society"),
            Node::new("c", NodeType::Event, "Difference Engine Demonstration"),
            Node::new("d", NodeType::Concept, "Mathematics"),
            Node::new("lonely", NodeType::Place, "Basalt Formation"),
        ],
        edges: vec![
            Edge::new("e_ab", "a", "b", EdgeType::AffiliatedWith),
            Edge::new("e_ac", "a", "c", EdgeType::ParticipatedIn),
            Edge::new("e_bd", "b", "d", EdgeType::PartOf),
        ],
        embeddings: HashMap::new(),
    }
}

pub fn sample_graph() -> InMemoryGraph {
    let snapshot = sample_snapshot();
    let mut graph = InMemoryGraph::new();
    for node in snapshot.nodes {
        graph.add_node(node);
    }
    for edge in snapshot.edges {
        graph.add_edge(edge).expect("sample edges reference sample nodes");
    }
    graph
}

/// x and y joined by two parallel edges, closed into a triangle through z.
pub fn cyclic_graph() -> InMemoryGraph {
    let mut graph = InMemoryGraph::new();
    for id in ["x", "y", "z"] {
        graph.add_node(Node::new(id, NodeType::Concept, id.to_uppercase()));
    }
    for (id, from, to) in [
        ("xy_1", "x", "y"),
        ("xy_2", "x", "y"),
        ("yz", "y", "z"),
        ("zx", "z", "x"),
    ] {
        graph
            .add_edge(Edge::new(id, from, to, EdgeType::RelatedTo))
            .expect("cyclic edges reference cyclic nodes");
    }
    graph
}

#[derive(Debug, Clone, Copy)]
pub enum StubBehavior {
    Answer,
    Fail,
    Hang(Duration),
}

/// Canned results for either index trait
pub struct StubIndex {
    results: Vec<SearchResult>,
    behavior: StubBehavior,
}

impl StubIndex {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            behavior: StubBehavior::Answer,
        }
    }

    pub fn behave(mut self, behavior: StubBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    async fn respond(&self, page: Page) -> Result<SearchPage> {
        match self.behavior {
            StubBehavior::Answer => {}
            StubBehavior::Fail => return Err(AppError::Internal("stub failure".to_string())),
            StubBehavior::Hang(d) => tokio::time::sleep(d).await,
        }
        Ok(SearchPage {
            results: page.apply(self.results.clone()),
            total: self.results.len(),
        })
    }
}

#[async_trait]
impl FullTextIndex for StubIndex {
    async fn search(
        &self,
        _query: &str,
        _type_filter: Option<NodeType>,
        page: Page,
    ) -> Result<SearchPage> {
        self.respond(page).await
    }

    async fn search_with_highlight(&self, _query: &str, page: Page) -> Result<SearchPage> {
        self.respond(page).await
    }

    async fn type_facets(&self, _query: &str) -> Result<HashMap<NodeType, usize>> {
        Ok(HashMap::new())
    }
}

#[async_trait]
impl VectorIndex for StubIndex {
    async fn search(
        &self,
        _embedding: &[f32],
        _threshold: f32,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        Ok(self.respond(Page::new(0, limit)).await?.results)
    }

    async fn node_vector(&self, _node_id: &str) -> Result<Option<Vec<f32>>> {
        Ok(None)
    }
}

pub struct TestContext {
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir, // Kept to ensure directory lives as long as context
}

impl TestContext {
    fn config(temp_dir: &TempDir) -> AppConfig {
        AppConfig {
            data_dir: temp_dir.path().to_path_buf(),
            vector_threshold: 0.3,
            timeout_ms: 200,
            embedding_dimensions: 256,
            log_level: "debug".to_string(),
            ..AppConfig::default()
        }
    }

    /// Sample graph with in-memory indexes built from its snapshot
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = Self::config(&temp_dir);

        let embedder: Arc<dyn Embedder> = Arc::new(EmbeddingService::new(
            Arc::new(HashEmbedder::new(config.embedding_dimensions)),
            config.embedding_cache_size,
        ));
        let loaded = sample_snapshot()
            .load(embedder.as_ref())
            .await
            .expect("Failed to load sample snapshot");

        let state = Arc::new(AppState {
            config,
            store: Arc::new(loaded.graph),
            text_index: Arc::new(loaded.text_index),
            vector_index: Arc::new(loaded.vector_index),
            embedder,
        });

        Self {
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Sample graph with caller-supplied indexes
    pub async fn with_indexes(
        text_index: Arc<dyn FullTextIndex>,
        vector_index: Arc<dyn VectorIndex>,
    ) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = Self::config(&temp_dir);
        let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::new(config.embedding_dimensions));

        let state = Arc::new(AppState {
            config,
            store: Arc::new(sample_graph()),
            text_index,
            vector_index,
            embedder,
        });

        Self {
            state,
            _temp_dir: temp_dir,
        }
    }
}
