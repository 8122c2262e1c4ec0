use crate::storage::GraphStore;
use crate::types::GraphStatistics;
use crate::Result;

/// Counts and type distributions for the whole graph.
pub async fn graph_statistics<S: GraphStore + ?Sized>(store: &S) -> Result<GraphStatistics> {
    let total_nodes = store.count_nodes().await?;
    let total_edges = store.count_edges().await?;

    let avg_connections_per_node = if total_nodes == 0 {
        0.0
    } else {
        (2 * total_edges) as f64 / total_nodes as f64
    };

    Ok(GraphStatistics {
        total_nodes,
        total_edges,
        node_types: store.node_type_counts().await?.into_iter().collect(),
        edge_types: store.edge_type_counts().await?.into_iter().collect(),
        avg_connections_per_node,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryGraph;
    use crate::test_utils::sample_graph;
    use crate::types::{EdgeType, NodeType};

    #[tokio::test]
    async fn test_sample_graph_stats() {
        let stats = graph_statistics(&sample_graph()).await.unwrap();
        assert_eq!(stats.total_nodes, 5);
        assert_eq!(stats.total_edges, 3);
        assert_eq!(stats.avg_connections_per_node, 1.2);
        assert_eq!(stats.node_types.get(&NodeType::Person), Some(&1));
        assert_eq!(stats.edge_types.get(&EdgeType::PartOf), Some(&1));
    }

    #[tokio::test]
    async fn test_empty_graph() {
        let stats = graph_statistics(&InMemoryGraph::new()).await.unwrap();
        assert_eq!(stats.total_nodes, 0);
        assert_eq!(stats.avg_connections_per_node, 0.0);
        assert!(stats.node_types.is_empty());
    }
}
