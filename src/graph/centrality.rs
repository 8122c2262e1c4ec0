use std::collections::{BTreeMap, BTreeSet};

use super::neighbor_ids;
use crate::storage::GraphStore;
use crate::types::AppError;
use crate::Result;

pub const MAX_CENTRALITY_NODES: usize = 1000;

/// Degree centrality of each requested node.
///
/// The numerator counts distinct neighbors in the whole graph while the
/// denominator is the size of the requested set minus one (at least 1). For
/// a set smaller than the graph, scores can exceed 1.0. Unknown ids score 0.
/// Repeated ids count once.
pub async fn calculate_centrality<S: GraphStore + ?Sized>(
    store: &S,
    node_ids: &[String],
) -> Result<BTreeMap<String, f64>> {
    let requested: BTreeSet<&str> = node_ids.iter().map(String::as_str).collect();
    if requested.is_empty() || requested.len() > MAX_CENTRALITY_NODES {
        return Err(AppError::InvalidArgument(format!(
            "centrality accepts 1 to {} distinct nodes, got {}",
            MAX_CENTRALITY_NODES,
            requested.len()
        )));
    }

    let normalizer = requested.len().saturating_sub(1).max(1) as f64;
    let mut scores = BTreeMap::new();
    for id in requested {
        let degree = neighbor_ids(store, id).await?.len();
        scores.insert(id.to_string(), degree as f64 / normalizer);
    }
    Ok(scores)
}
