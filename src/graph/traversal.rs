use std::collections::{BTreeMap, HashSet};

use crate::storage::GraphStore;
use crate::types::{AppError, GraphEdge, GraphNeighborhood, GraphNode};
use crate::Result;

pub const MIN_HOPS: u32 = 1;
pub const MAX_HOPS: u32 = 3;

/// Level-by-level BFS around a center node.
///
/// Edges are tracked by id, separately from nodes, so parallel edges are all
/// reported and an edge reached from both endpoints is reported once. A node
/// keeps the hop of its first discovery, which BFS order makes minimal.
pub struct NeighborhoodExplorer<'a, S: GraphStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: GraphStore + ?Sized> NeighborhoodExplorer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn explore(&self, center_id: &str, max_hops: u32) -> Result<GraphNeighborhood> {
        if !(MIN_HOPS..=MAX_HOPS).contains(&max_hops) {
            return Err(AppError::InvalidArgument(format!(
                "hops must be between {} and {}, got {}",
                MIN_HOPS, MAX_HOPS, max_hops
            )));
        }

        tracing::debug!(center = center_id, max_hops, "Exploring neighborhood");

        let center = self
            .store
            .get_node(center_id)
            .await?
            .ok_or_else(|| AppError::node_not_found(center_id))?;

        let mut visited_nodes: HashSet<String> = HashSet::new();
        let mut visited_edges: HashSet<String> = HashSet::new();
        let mut nodes: Vec<GraphNode> = Vec::new();
        let mut edges: Vec<GraphEdge> = Vec::new();

        visited_nodes.insert(center_id.to_string());
        nodes.push(GraphNode::from_node(center, 0));

        let mut frontier: Vec<String> = vec![center_id.to_string()];

        for hop in 1..=max_hops {
            let mut next_frontier: Vec<String> = Vec::new();

            for current in &frontier {
                let outgoing = self.store.edges_from(current).await?;
                let incoming = self.store.edges_to(current).await?;

                for edge in outgoing.into_iter().chain(incoming) {
                    if !visited_edges.insert(edge.id.clone()) {
                        continue;
                    }

                    let far = edge.far_end(current).to_string();
                    if visited_nodes.insert(far.clone()) {
                        match self.store.get_node(&far).await? {
                            Some(node) => {
                                nodes.push(GraphNode::from_node(node, hop));
                                next_frontier.push(far);
                            }
                            None => {
                                tracing::warn!(edge = %edge.id, node = %far, "Edge endpoint missing from store");
                            }
                        }
                    }

                    edges.push(GraphEdge::from_edge(edge, hop));
                }
            }

            frontier = next_frontier;
            if frontier.is_empty() {
                break;
            }
        }

        let mut nodes_per_hop: BTreeMap<u32, usize> = BTreeMap::new();
        for node in &nodes {
            *nodes_per_hop.entry(node.hop_level).or_insert(0) += 1;
        }

        Ok(GraphNeighborhood {
            center_node_id: Some(center_id.to_string()),
            requested_hops: Some(max_hops),
            actual_hops: Some(nodes_per_hop.len().saturating_sub(1) as u32),
            total_nodes: nodes.len(),
            total_edges: edges.len(),
            nodes,
            edges,
            nodes_per_hop,
        })
    }
}
