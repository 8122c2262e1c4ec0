use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::graph::{Edge, EdgeType, Node, NodeType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    pub properties: HashMap<String, serde_json::Value>,
    pub hop_level: u32,
}

impl GraphNode {
    pub fn from_node(node: Node, hop_level: u32) -> Self {
        Self {
            id: node.id,
            node_type: node.node_type,
            name: node.name,
            properties: node.properties,
            hop_level,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub properties: HashMap<String, serde_json::Value>,
    pub hop_level: u32,
}

impl GraphEdge {
    pub fn from_edge(edge: Edge, hop_level: u32) -> Self {
        Self {
            id: edge.id,
            source_id: edge.source_id,
            target_id: edge.target_id,
            edge_type: edge.edge_type,
            properties: edge.properties,
            hop_level,
        }
    }
}

/// Nodes and edges around a center, labeled with the hop at which each was
/// first reached. Also used for extracted subgraphs, which have no center.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GraphNeighborhood {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_hops: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_hops: Option<u32>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub nodes_per_hop: BTreeMap<u32, usize>,
    pub total_nodes: usize,
    pub total_edges: usize,
}

impl GraphNeighborhood {
    pub fn hop_of(&self, node_id: &str) -> Option<u32> {
        self.nodes
            .iter()
            .find(|n| n.id == node_id)
            .map(|n| n.hop_level)
    }

    pub fn contains_edge(&self, edge_id: &str) -> bool {
        self.edges.iter().any(|e| e.id == edge_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShortestPath {
    pub from: String,
    pub to: String,
    pub path: Vec<String>,
    /// Edge count of the path, `None` when no path exists within the bound.
    pub distance: Option<usize>,
    pub found: bool,
}

impl ShortestPath {
    pub fn new(from: &str, to: &str, path: Vec<String>) -> Self {
        let distance = if path.is_empty() {
            None
        } else {
            Some(path.len() - 1)
        };
        Self {
            from: from.to_string(),
            to: to.to_string(),
            found: !path.is_empty(),
            path,
            distance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub node_types: BTreeMap<NodeType, usize>,
    pub edge_types: BTreeMap<EdgeType, usize>,
    pub avg_connections_per_node: f64,
}
