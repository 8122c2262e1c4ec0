use std::collections::{BTreeSet, VecDeque};

use super::neighbor_ids;
use crate::storage::GraphStore;
use crate::types::AppError;
use crate::Result;

/// Every node reachable from `seed_id` when edges are treated as undirected.
/// No hop limit.
pub async fn connected_component<S: GraphStore + ?Sized>(
    store: &S,
    seed_id: &str,
) -> Result<BTreeSet<String>> {
    if store.get_node(seed_id).await?.is_none() {
        return Err(AppError::node_not_found(seed_id));
    }

    let mut component = BTreeSet::from([seed_id.to_string()]);
    let mut queue = VecDeque::from([seed_id.to_string()]);

    while let Some(current) = queue.pop_front() {
        for next in neighbor_ids(store, &current).await? {
            if component.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }

    tracing::debug!(seed = seed_id, size = component.len(), "Connected component resolved");
    Ok(component)
}
