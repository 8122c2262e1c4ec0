use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use super::upstream_error;
use crate::config::{AppConfig, AppState};
use crate::search::{adaptive_weights, fuse, suggestions, PROBE_SIZE};
use crate::storage::{Embedder, FullTextIndex, GraphStore, VectorIndex};
use crate::types::{
    AppError, FusionWeights, NodeType, Page, SearchResponse, SearchResult, SearchType,
};
use crate::Result;

const FULL_TEXT: &str = "full-text";
const VECTOR: &str = "vector";
const EMBEDDING: &str = "embedding";

/// Keyword, vector and fused search over the node indexes
pub struct SearchService {
    config: AppConfig,
    store: Arc<dyn GraphStore>,
    text_index: Arc<dyn FullTextIndex>,
    vector_index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
}

fn require_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidArgument(
            "query must not be blank".to_string(),
        ));
    }
    Ok(trimmed)
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

impl SearchService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            store: state.store.clone(),
            text_index: state.text_index.clone(),
            vector_index: state.vector_index.clone(),
            embedder: state.embedder.clone(),
        }
    }

    /// Run a collaborator call under the configured timeout, attributing any
    /// failure to `backend`.
    async fn bounded<T>(
        &self,
        backend: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.config.timeout(), fut).await {
            Ok(result) => result.map_err(upstream_error(backend)),
            Err(_) => Err(AppError::upstream(
                backend,
                format!("timed out after {} ms", self.config.timeout_ms),
            )),
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embedder
            .embed(text)
            .await
            .map_err(upstream_error(EMBEDDING))
    }

    async fn facets(&self, query: &str) -> Result<BTreeMap<String, usize>> {
        let facets = self
            .text_index
            .type_facets(query)
            .await
            .map_err(upstream_error(FULL_TEXT))?;
        Ok(facets
            .into_iter()
            .map(|(t, count)| (t.as_str().to_string(), count))
            .collect())
    }

    /// Full-text search. With `highlight`, results carry highlighted
    /// snippets and the type filter is not applied; without it, each result
    /// carries its connection count.
    pub async fn search(
        &self,
        query: &str,
        type_filter: Option<NodeType>,
        page: Page,
        highlight: bool,
    ) -> Result<SearchResponse> {
        let start = Instant::now();
        let query = require_query(query)?;
        tracing::debug!(query, ?type_filter, highlight, "Full-text search");

        let found = if highlight {
            self.text_index.search_with_highlight(query, page).await
        } else {
            self.text_index.search(query, type_filter, page).await
        }
        .map_err(upstream_error(FULL_TEXT))?;

        let mut results = found.results;
        if !highlight {
            for result in &mut results {
                result.connection_count = Some(self.store.degree(&result.id).await?);
            }
        }

        let mut response =
            SearchResponse::new(query, SearchType::FullText, results, found.total, page)
                .with_score_range();
        response.type_facets = self.facets(query).await?;
        response.search_time_ms = elapsed_ms(start);
        Ok(response)
    }

    /// Nearest nodes to the embedded query. Threshold and limit default to
    /// the configured values.
    pub async fn vector_search(
        &self,
        query: &str,
        threshold: Option<f32>,
        limit: Option<usize>,
    ) -> Result<SearchResponse> {
        let start = Instant::now();
        let query = require_query(query)?;
        let threshold = threshold.unwrap_or(self.config.vector_threshold);
        let limit = limit.unwrap_or(self.config.vector_k);
        tracing::debug!(query, threshold, limit, "Vector search");

        let results = self.vector_results(query, threshold, limit).await?;
        let total = results.len();

        let mut response =
            SearchResponse::new(query, SearchType::Vector, results, total, Page::new(0, limit))
                .with_score_range();
        response.search_time_ms = elapsed_ms(start);
        Ok(response)
    }

    async fn vector_results(
        &self,
        query: &str,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let embedding = self.embed(query).await?;
        self.vector_index
            .search(&embedding, threshold, limit)
            .await
            .map_err(upstream_error(VECTOR))
    }

    /// Nodes whose vectors are closest to the given node's own vector.
    pub async fn similar_nodes(
        &self,
        node_id: &str,
        limit: Option<usize>,
    ) -> Result<SearchResponse> {
        let start = Instant::now();
        let limit = limit.unwrap_or(self.config.vector_k);
        let node = self
            .store
            .get_node(node_id)
            .await?
            .ok_or_else(|| AppError::node_not_found(node_id))?;

        let stored = self
            .vector_index
            .node_vector(node_id)
            .await
            .map_err(upstream_error(VECTOR))?;
        let embedding = match stored {
            Some(v) => v,
            None => {
                tracing::warn!(node = node_id, "No stored vector, embedding node text");
                self.embed(&node.searchable_text()).await?
            }
        };

        let results: Vec<SearchResult> = self
            .vector_index
            .search(&embedding, self.config.vector_threshold, limit.saturating_add(1))
            .await
            .map_err(upstream_error(VECTOR))?
            .into_iter()
            .filter(|r| r.id != node_id)
            .take(limit)
            .collect();
        let total = results.len();

        let description = format!("Similar to: {}", node.name);
        let mut response =
            SearchResponse::new(&description, SearchType::Vector, results, total, Page::new(0, limit))
                .with_score_range();
        response.search_time_ms = elapsed_ms(start);
        Ok(response)
    }

    /// Fused full-text and vector search. Both branches run concurrently and
    /// either one failing or timing out fails the request.
    pub async fn hybrid_search(
        &self,
        query: &str,
        fts_weight: Option<f64>,
        vector_weight: Option<f64>,
        page: Page,
    ) -> Result<SearchResponse> {
        let start = Instant::now();
        let query = require_query(query)?;
        let weights = FusionWeights::new(
            fts_weight.unwrap_or(self.config.default_fts_weight),
            vector_weight.unwrap_or(self.config.default_vector_weight),
        )
        .normalized();
        tracing::debug!(query, fts = weights.fts, vector = weights.vector, "Hybrid search");

        let fts_branch = self.bounded(FULL_TEXT, async {
            let found = self
                .text_index
                .search_with_highlight(query, Page::new(0, page.end()))
                .await?;
            let facets = self.facets(query).await?;
            Ok::<_, AppError>((found.results, facets))
        });
        let vector_branch = self.bounded(
            VECTOR,
            self.vector_results(
                query,
                self.config.vector_threshold,
                page.end().saturating_mul(2),
            ),
        );

        let ((fts_results, facets), vector_results) = tokio::try_join!(fts_branch, vector_branch)?;

        let fused = fuse(fts_results, vector_results, weights, page);
        let mut response =
            SearchResponse::new(query, SearchType::Hybrid, fused.results, fused.total, page)
                .with_score_range();
        response.type_facets = facets;
        response.weights = Some(weights);
        response.search_time_ms = elapsed_ms(start);
        Ok(response)
    }

    /// Hybrid search weighted by how well each back-end answers a small
    /// probe of the same query.
    pub async fn adaptive_hybrid_search(&self, query: &str, page: Page) -> Result<SearchResponse> {
        let start = Instant::now();
        let query = require_query(query)?;
        tracing::debug!(query, "Adaptive hybrid search");

        let fts_probe = self.bounded(FULL_TEXT, async {
            let found = self
                .text_index
                .search(query, None, Page::new(0, PROBE_SIZE))
                .await?;
            Ok::<_, AppError>(found.results)
        });
        let vector_probe = self.bounded(
            VECTOR,
            self.vector_results(query, self.config.vector_threshold, PROBE_SIZE),
        );
        let (fts_probe, vector_probe) = tokio::try_join!(fts_probe, vector_probe)?;

        let weights = adaptive_weights(&fts_probe, &vector_probe);
        tracing::info!(fts = weights.fts, vector = weights.vector, "Adaptive weights");

        let mut response = self
            .hybrid_search(query, Some(weights.fts), Some(weights.vector), page)
            .await?;
        response.search_time_ms = elapsed_ms(start);
        Ok(response)
    }

    pub fn suggest(&self, query: &str) -> Result<Vec<String>> {
        Ok(suggestions(require_query(query)?))
    }
}
