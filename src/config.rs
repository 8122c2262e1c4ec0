use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::embedding::DEFAULT_DIMENSIONS;
use crate::storage::{Embedder, FullTextIndex, GraphStore, VectorIndex};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub default_fts_weight: f64,
    pub default_vector_weight: f64,
    pub vector_threshold: f32,
    pub vector_k: usize,
    pub timeout_ms: u64,
    pub neighborhood_cache_size: u64,
    pub neighborhood_cache_ttl_secs: u64,
    pub embedding_cache_size: usize,
    pub embedding_dimensions: usize,
    pub log_level: String,
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn neighborhood_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.neighborhood_cache_ttl_secs)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join("graph.json")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("kg-query"),
            default_fts_weight: 0.5,
            default_vector_weight: 0.5,
            vector_threshold: 0.7,
            vector_k: 10,
            timeout_ms: 30000,
            neighborhood_cache_size: 1000,
            neighborhood_cache_ttl_secs: 300,
            embedding_cache_size: 1000,
            embedding_dimensions: DEFAULT_DIMENSIONS,
            log_level: "info".to_string(),
        }
    }
}

/// Shared collaborators for the query services
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn GraphStore>,
    pub text_index: Arc<dyn FullTextIndex>,
    pub vector_index: Arc<dyn VectorIndex>,
    pub embedder: Arc<dyn Embedder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.default_fts_weight + config.default_vector_weight, 1.0);
        assert_eq!(config.vector_threshold, 0.7);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.neighborhood_cache_ttl(), Duration::from_secs(300));
        assert!(config.snapshot_path().ends_with("kg-query/graph.json"));
    }
}
