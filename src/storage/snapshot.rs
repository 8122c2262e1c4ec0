use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Embedder, InMemoryGraph, InMemoryTextIndex, InMemoryVectorIndex};
use crate::types::{Edge, Node};
use crate::Result;

/// Serialized graph as produced by an ingestion run.
///
/// `embeddings` is optional per node; nodes without a stored vector are
/// embedded from their searchable text when the snapshot is loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub embeddings: HashMap<String, Vec<f32>>,
}

/// Collaborators materialized from a snapshot
pub struct LoadedGraph {
    pub graph: InMemoryGraph,
    pub text_index: InMemoryTextIndex,
    pub vector_index: InMemoryVectorIndex,
}

impl GraphSnapshot {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub async fn load(self, embedder: &dyn Embedder) -> Result<LoadedGraph> {
        let mut graph = InMemoryGraph::new();
        let mut vector_index = InMemoryVectorIndex::new(embedder.dimensions());
        let text_index = InMemoryTextIndex::from_nodes(&self.nodes);

        let mut embedded = 0usize;
        for node in self.nodes {
            let vector = match self.embeddings.get(&node.id) {
                Some(v) => v.clone(),
                None => {
                    embedded += 1;
                    embedder.embed(&node.searchable_text()).await?
                }
            };
            vector_index.insert(node.clone(), vector)?;
            graph.add_node(node);
        }

        for edge in self.edges {
            graph.add_edge(edge)?;
        }

        tracing::info!(
            nodes = vector_index.len(),
            edges = graph.edges().len(),
            embedded,
            "Graph snapshot loaded"
        );

        Ok(LoadedGraph {
            graph,
            text_index,
            vector_index,
        })
    }
}
