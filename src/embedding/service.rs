use std::sync::Arc;

use async_trait::async_trait;

use super::cache::{CacheStats, EmbeddingCache, QueryKey};
use crate::storage::Embedder;
use crate::types::AppError;
use crate::Result;

/// Embedder front that memoizes query vectors.
pub struct EmbeddingService {
    inner: Arc<dyn Embedder>,
    cache: EmbeddingCache,
}

impl EmbeddingService {
    pub fn new(inner: Arc<dyn Embedder>, cache_size: usize) -> Self {
        Self {
            inner,
            cache: EmbeddingCache::new(cache_size),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[async_trait]
impl Embedder for EmbeddingService {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let model = self.inner.model_name();
        let key = QueryKey::new(model, self.inner.dimensions(), text);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.to_vec());
        }

        let embedding = self.inner.embed(text).await.map_err(|e| match e {
            AppError::Upstream { .. } => e,
            other => AppError::upstream("embedding", other),
        })?;
        if embedding.len() != self.inner.dimensions() {
            return Err(AppError::upstream(
                "embedding",
                format!(
                    "model {} returned {} dimensions, expected {}",
                    model,
                    embedding.len(),
                    self.inner.dimensions()
                ),
            ));
        }

        Ok(self.cache.insert(key, embedding).to_vec())
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
