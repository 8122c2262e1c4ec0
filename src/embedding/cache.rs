use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cache identity of a query embedding.
///
/// Digest of the model name, the output width and the query words with case
/// and whitespace runs folded, so `"Ada  Lovelace"` and `"ada lovelace"`
/// share an entry while two models (or two widths of one model) never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey([u8; 32]);

impl QueryKey {
    pub fn new(model: &str, dimensions: usize, text: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(model.len() as u64).to_le_bytes());
        hasher.update(model.as_bytes());
        hasher.update(&(dimensions as u64).to_le_bytes());
        for word in text.split_whitespace() {
            hasher.update(&[0]);
            hasher.update(word.to_lowercase().as_bytes());
        }
        Self(*hasher.finalize().as_bytes())
    }
}

struct CacheState {
    entries: LruCache<QueryKey, Arc<[f32]>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Bounded LRU of query vectors. Counters live under the same lock as the
/// entries so a stats snapshot is consistent.
pub struct EmbeddingCache {
    state: Mutex<CacheState>,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &QueryKey) -> Option<Arc<[f32]>> {
        let mut state = self.state();
        let found = state.entries.get(key).cloned();
        match found {
            Some(_) => state.hits += 1,
            None => state.misses += 1,
        }
        found
    }

    /// Store `vector` under `key` and hand back the shared copy.
    pub fn insert(&self, key: QueryKey, vector: Vec<f32>) -> Arc<[f32]> {
        let shared: Arc<[f32]> = vector.into();
        let mut state = self.state();
        if let Some((displaced, _)) = state.entries.push(key, shared.clone()) {
            if displaced != key {
                state.evictions += 1;
            }
        }
        shared
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
            size: state.entries.len(),
            capacity: state.entries.cap().get(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: usize,
    pub capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str) -> QueryKey {
        QueryKey::new("blake3-hash", 8, text)
    }

    #[test]
    fn test_key_folds_case_and_spacing() {
        assert_eq!(key("Ada  Lovelace "), key("ada lovelace"));
        assert_ne!(key("ada lovelace"), key("adalovelace"));
    }

    #[test]
    fn test_key_separates_model_and_width() {
        let base = QueryKey::new("m", 8, "query");
        assert_ne!(base, QueryKey::new("m2", 8, "query"));
        assert_ne!(base, QueryKey::new("m", 16, "query"));
    }

    #[test]
    fn test_lookup_counts() {
        let cache = EmbeddingCache::new(4);
        assert!(cache.get(&key("society")).is_none());
        cache.insert(key("society"), vec![0.5, 0.5]);
        assert_eq!(cache.get(&key("Society")).as_deref(), Some(&[0.5, 0.5][..]));

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
        assert_eq!(stats.capacity, 4);
    }

    #[test]
    fn test_eviction_is_counted_but_overwrite_is_not() {
        let cache = EmbeddingCache::new(1);
        cache.insert(key("a"), vec![1.0]);
        cache.insert(key("a"), vec![1.5]);
        assert_eq!(cache.stats().evictions, 0);

        cache.insert(key("b"), vec![2.0]);
        assert!(cache.get(&key("a")).is_none());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_zero_capacity_holds_one_entry() {
        let cache = EmbeddingCache::new(0);
        cache.insert(key("x"), vec![1.0]);
        assert_eq!(cache.stats().size, 1);
    }
}
