mod cache;
pub mod hasher;
mod service;
pub mod similarity;

pub use cache::{CacheStats, EmbeddingCache, QueryKey};
pub use hasher::{HashEmbedder, DEFAULT_DIMENSIONS};
pub use service::EmbeddingService;
pub use similarity::{cosine_similarity, l2_normalize};
