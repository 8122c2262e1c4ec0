//! Structural queries over a [`GraphStore`]
//!
//! - `traversal`: bounded-hop neighborhood BFS
//! - `path`: hop-limited shortest path
//! - `component`: connected component of a seed node
//! - `centrality`: normalized degree centrality
//! - `subgraph`: induced subgraph of a node set
//! - `stats`: whole-graph counts and distributions
//! - `cache`: neighborhood memoization

pub mod cache;
pub mod centrality;
pub mod component;
pub mod path;
pub mod stats;
pub mod subgraph;
pub mod traversal;

pub use cache::NeighborhoodCache;
pub use centrality::{calculate_centrality, MAX_CENTRALITY_NODES};
pub use component::connected_component;
pub use path::{shortest_path, DEFAULT_PATH_HOPS};
pub use stats::graph_statistics;
pub use subgraph::{extract_subgraph, MAX_SUBGRAPH_NODES};
pub use traversal::{NeighborhoodExplorer, MAX_HOPS, MIN_HOPS};

use std::collections::HashSet;

use crate::storage::GraphStore;
use crate::Result;

/// Distinct ids one hop away in either direction, outgoing targets first,
/// in the order the store returns them.
pub async fn neighbor_ids<S: GraphStore + ?Sized>(store: &S, node_id: &str) -> Result<Vec<String>> {
    let outgoing = store.edges_from(node_id).await?;
    let incoming = store.edges_to(node_id).await?;

    let mut seen = HashSet::new();
    let ids = outgoing
        .into_iter()
        .map(|e| e.target_id)
        .chain(incoming.into_iter().map(|e| e.source_id))
        .filter(|id| seen.insert(id.clone()))
        .collect();
    Ok(ids)
}
