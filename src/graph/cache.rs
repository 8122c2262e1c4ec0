use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::types::GraphNeighborhood;

/// Memoized neighborhoods keyed by `(center_id, max_hops)`.
///
/// Entries expire after the configured TTL. Callers that mutate the graph
/// must call [`NeighborhoodCache::invalidate_all`].
#[derive(Clone)]
pub struct NeighborhoodCache {
    inner: Cache<(String, u32), Arc<GraphNeighborhood>>,
}

impl NeighborhoodCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, center_id: &str, max_hops: u32) -> Option<Arc<GraphNeighborhood>> {
        self.inner.get(&(center_id.to_string(), max_hops)).await
    }

    pub async fn insert(&self, center_id: &str, max_hops: u32, value: Arc<GraphNeighborhood>) {
        self.inner
            .insert((center_id.to_string(), max_hops), value)
            .await;
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}
