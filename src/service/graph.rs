use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::Timed;
use crate::config::AppState;
use crate::graph::{
    calculate_centrality, connected_component, extract_subgraph, graph_statistics,
    shortest_path, NeighborhoodCache, NeighborhoodExplorer, DEFAULT_PATH_HOPS,
};
use crate::storage::GraphStore;
use crate::types::{AppError, GraphNeighborhood, GraphStatistics, ShortestPath};
use crate::Result;

/// Structural queries against the graph store
pub struct GraphService {
    store: Arc<dyn GraphStore>,
    cache: Option<NeighborhoodCache>,
}

impl GraphService {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store, cache: None }
    }

    pub fn with_cache(mut self, cache: NeighborhoodCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Service over the shared store, caching neighborhoods unless the
    /// configured cache size is zero.
    pub fn from_state(state: &AppState) -> Self {
        let service = Self::new(state.store.clone());
        if state.config.neighborhood_cache_size == 0 {
            return service;
        }
        service.with_cache(NeighborhoodCache::new(
            state.config.neighborhood_cache_size,
            state.config.neighborhood_cache_ttl(),
        ))
    }

    pub async fn get_neighborhood(
        &self,
        center_id: &str,
        max_hops: u32,
    ) -> Result<Timed<GraphNeighborhood>> {
        Timed::measure(async {
            if let Some(cache) = &self.cache {
                if let Some(hit) = cache.get(center_id, max_hops).await {
                    tracing::debug!(center = center_id, max_hops, "Neighborhood cache hit");
                    return Ok(GraphNeighborhood::clone(&hit));
                }
            }

            let neighborhood = NeighborhoodExplorer::new(self.store.as_ref())
                .explore(center_id, max_hops)
                .await?;

            if let Some(cache) = &self.cache {
                cache
                    .insert(center_id, max_hops, Arc::new(neighborhood.clone()))
                    .await;
            }
            Ok::<_, AppError>(neighborhood)
        })
        .await
    }

    pub async fn find_shortest_path(
        &self,
        source_id: &str,
        target_id: &str,
        max_hops: Option<usize>,
    ) -> Result<Timed<ShortestPath>> {
        let max_hops = max_hops.unwrap_or(DEFAULT_PATH_HOPS);
        Timed::measure(async {
            let path = shortest_path(self.store.as_ref(), source_id, target_id, max_hops).await?;
            Ok::<_, AppError>(ShortestPath::new(source_id, target_id, path))
        })
        .await
    }

    pub async fn extract_subgraph(&self, node_ids: &[String]) -> Result<Timed<GraphNeighborhood>> {
        Timed::measure(extract_subgraph(self.store.as_ref(), node_ids)).await
    }

    pub async fn get_connected_component(&self, seed_id: &str) -> Result<Timed<BTreeSet<String>>> {
        Timed::measure(connected_component(self.store.as_ref(), seed_id)).await
    }

    pub async fn calculate_centrality(
        &self,
        node_ids: &[String],
    ) -> Result<Timed<BTreeMap<String, f64>>> {
        Timed::measure(calculate_centrality(self.store.as_ref(), node_ids)).await
    }

    pub async fn graph_statistics(&self) -> Result<Timed<GraphStatistics>> {
        Timed::measure(graph_statistics(self.store.as_ref())).await
    }

    /// Drop cached neighborhoods after the underlying graph changed.
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}
