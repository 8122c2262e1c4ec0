use std::collections::{HashSet, VecDeque};

use super::neighbor_ids;
use crate::storage::GraphStore;
use crate::types::AppError;
use crate::Result;

pub const DEFAULT_PATH_HOPS: usize = 5;

/// Shortest undirected path from `source_id` to `target_id` using at most
/// `max_hops` edges. Returns the node ids along the path, or an empty vec when
/// the target is out of reach.
///
/// Each queue entry carries its full path. A path is only expanded while it
/// has at most `max_hops` nodes, so the longest path returned has `max_hops`
/// edges.
pub async fn shortest_path<S: GraphStore + ?Sized>(
    store: &S,
    source_id: &str,
    target_id: &str,
    max_hops: usize,
) -> Result<Vec<String>> {
    for id in [source_id, target_id] {
        if store.get_node(id).await?.is_none() {
            return Err(AppError::node_not_found(id));
        }
    }

    if source_id == target_id {
        return Ok(vec![source_id.to_string()]);
    }

    tracing::debug!(source = source_id, target = target_id, max_hops, "Finding shortest path");

    let mut visited: HashSet<String> = HashSet::from([source_id.to_string()]);
    let mut queue: VecDeque<Vec<String>> = VecDeque::from([vec![source_id.to_string()]]);

    while queue.front().is_some_and(|p| p.len() <= max_hops) {
        let Some(path) = queue.pop_front() else {
            break;
        };
        let Some(current) = path.last() else {
            continue;
        };

        for next in neighbor_ids(store, current).await? {
            if next == target_id {
                let mut found = path.clone();
                found.push(next);
                return Ok(found);
            }
            if visited.insert(next.clone()) {
                let mut extended = path.clone();
                extended.push(next);
                queue.push_back(extended);
            }
        }
    }

    Ok(Vec::new())
}
