//! Collaborator trait definitions
//!
//! The query core only reads through these interfaces. The in-memory
//! adapters in this module tree implement them; a production deployment
//! plugs in its own store and indexes.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::types::{Edge, EdgeType, Node, NodeType, Page, SearchPage, SearchResult};
use crate::Result;

/// Read access to nodes and edges
#[async_trait]
pub trait GraphStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Nodes
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a node by ID
    async fn get_node(&self, id: &str) -> Result<Option<Node>>;

    /// Count total number of nodes
    async fn count_nodes(&self) -> Result<usize>;

    /// Node count per type
    async fn node_type_counts(&self) -> Result<HashMap<NodeType, usize>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Edges
    // ─────────────────────────────────────────────────────────────────────────

    /// Edges whose source is `node_id`
    async fn edges_from(&self, node_id: &str) -> Result<Vec<Edge>>;

    /// Edges whose target is `node_id`
    async fn edges_to(&self, node_id: &str) -> Result<Vec<Edge>>;

    /// Paginated `edges_from`
    async fn edges_from_page(&self, node_id: &str, page: Page) -> Result<Vec<Edge>> {
        Ok(page.apply(self.edges_from(node_id).await?))
    }

    /// Paginated `edges_to`
    async fn edges_to_page(&self, node_id: &str, page: Page) -> Result<Vec<Edge>> {
        Ok(page.apply(self.edges_to(node_id).await?))
    }

    /// Count total number of edges
    async fn count_edges(&self) -> Result<usize>;

    /// Edge count per type
    async fn edge_type_counts(&self) -> Result<HashMap<EdgeType, usize>>;

    /// Number of edges touching `node_id` in either direction
    async fn degree(&self, node_id: &str) -> Result<usize> {
        Ok(self.edges_from(node_id).await?.len() + self.edges_to(node_id).await?.len())
    }
}

/// Ranked keyword search over node text
#[async_trait]
pub trait FullTextIndex: Send + Sync {
    /// Ranked matches, optionally restricted to one node type
    async fn search(
        &self,
        query: &str,
        type_filter: Option<NodeType>,
        page: Page,
    ) -> Result<SearchPage>;

    /// Same ranking, with `highlighted_snippet` populated
    async fn search_with_highlight(&self, query: &str, page: Page) -> Result<SearchPage>;

    /// Match count per node type
    async fn type_facets(&self, query: &str) -> Result<HashMap<NodeType, usize>>;
}

/// Nearest-neighbour search over stored vectors
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Matches with cosine similarity >= `threshold`, best first
    async fn search(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Stored vector for a node, if one was indexed
    async fn node_vector(&self, node_id: &str) -> Result<Option<Vec<f32>>>;
}

/// Text to vector
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn dimensions(&self) -> usize;

    fn model_name(&self) -> &str;
}
