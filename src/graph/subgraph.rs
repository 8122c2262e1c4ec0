use std::collections::HashSet;

use crate::storage::GraphStore;
use crate::types::{AppError, GraphEdge, GraphNeighborhood, GraphNode};
use crate::Result;

pub const MAX_SUBGRAPH_NODES: usize = 100;

/// Subgraph induced by `node_ids`: the nodes that exist, plus every edge whose
/// endpoints are both in the set. Everything is reported at hop 0.
pub async fn extract_subgraph<S: GraphStore + ?Sized>(
    store: &S,
    node_ids: &[String],
) -> Result<GraphNeighborhood> {
    if node_ids.is_empty() || node_ids.len() > MAX_SUBGRAPH_NODES {
        return Err(AppError::InvalidArgument(format!(
            "subgraph accepts 1 to {} nodes, got {}",
            MAX_SUBGRAPH_NODES,
            node_ids.len()
        )));
    }

    let requested: HashSet<&str> = node_ids.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for id in node_ids {
        if !seen.insert(id.as_str()) {
            continue;
        }
        let Some(node) = store.get_node(id).await? else {
            tracing::warn!(node = %id, "Skipping unknown node in subgraph request");
            continue;
        };
        nodes.push(GraphNode::from_node(node, 0));

        for edge in store.edges_from(id).await? {
            if requested.contains(edge.target_id.as_str()) {
                edges.push(GraphEdge::from_edge(edge, 0));
            }
        }
    }

    Ok(GraphNeighborhood {
        total_nodes: nodes.len(),
        total_edges: edges.len(),
        nodes,
        edges,
        ..Default::default()
    })
}
