use async_trait::async_trait;

use super::text::truncate_snippet;
use super::VectorIndex;
use crate::embedding::cosine_similarity;
use crate::types::{AppError, Node, SearchResult};
use crate::Result;

struct VectorEntry {
    node: Node,
    vector: Vec<f32>,
}

/// Brute-force cosine index. Every query scans all entries.
pub struct InMemoryVectorIndex {
    dimensions: usize,
    entries: Vec<VectorEntry>,
}

impl InMemoryVectorIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index `vector` for `node`, replacing any previous vector for it.
    pub fn insert(&mut self, node: Node, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(AppError::InvalidArgument(format!(
                "vector for node {} has {} dimensions, index expects {}",
                node.id,
                vector.len(),
                self.dimensions
            )));
        }
        self.entries.retain(|e| e.node.id != node.id);
        self.entries.push(VectorEntry { node, vector });
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn search(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let mut scored = Vec::new();
        for entry in &self.entries {
            let similarity = cosine_similarity(embedding, &entry.vector)?;
            if similarity >= threshold {
                scored.push((entry, similarity));
            }
        }

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.node.id.cmp(&b.0.node.id))
        });

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(entry, similarity)| {
                let mut result = SearchResult::from_node(&entry.node).with_score(similarity as f64);
                result.snippet = Some(truncate_snippet(&entry.node.searchable_text()));
                result
            })
            .collect())
    }

    async fn node_vector(&self, node_id: &str) -> Result<Option<Vec<f32>>> {
        Ok(self
            .entries
            .iter()
            .find(|e| e.node.id == node_id)
            .map(|e| e.vector.clone()))
    }
}
