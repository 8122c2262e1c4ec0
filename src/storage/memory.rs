use std::collections::HashMap;

use async_trait::async_trait;

use super::GraphStore;
use crate::types::{AppError, Edge, EdgeType, Node, NodeType};
use crate::Result;

/// Graph held in process memory.
///
/// Edges are returned in insertion order, which keeps traversal output
/// stable across runs over the same data.
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    nodes: HashMap<String, Node>,
    node_order: Vec<String>,
    edges: Vec<Edge>,
    edge_ids: HashMap<String, usize>,
    outgoing: HashMap<String, Vec<usize>>,
    incoming: HashMap<String, Vec<usize>>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node. Replacing keeps the original position.
    pub fn add_node(&mut self, node: Node) {
        if !self.nodes.contains_key(&node.id) {
            self.node_order.push(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
    }

    /// Insert an edge. Both endpoints must already exist and the edge id
    /// must be new.
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        for endpoint in [&edge.source_id, &edge.target_id] {
            if !self.nodes.contains_key(endpoint) {
                return Err(AppError::NotFound(format!(
                    "node {} referenced by edge {}",
                    endpoint, edge.id
                )));
            }
        }
        if self.edge_ids.contains_key(&edge.id) {
            return Err(AppError::InvalidArgument(format!(
                "duplicate edge id {}",
                edge.id
            )));
        }

        let idx = self.edges.len();
        self.edge_ids.insert(edge.id.clone(), idx);
        self.outgoing
            .entry(edge.source_id.clone())
            .or_default()
            .push(idx);
        self.incoming
            .entry(edge.target_id.clone())
            .or_default()
            .push(idx);
        self.edges.push(edge);
        Ok(())
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn collect(&self, index: &HashMap<String, Vec<usize>>, node_id: &str) -> Vec<Edge> {
        index
            .get(node_id)
            .map(|ids| ids.iter().map(|&i| self.edges[i].clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraph {
    async fn get_node(&self, id: &str) -> Result<Option<Node>> {
        Ok(self.nodes.get(id).cloned())
    }

    async fn count_nodes(&self) -> Result<usize> {
        Ok(self.nodes.len())
    }

    async fn node_type_counts(&self) -> Result<HashMap<NodeType, usize>> {
        let mut counts = HashMap::new();
        for node in self.nodes.values() {
            *counts.entry(node.node_type).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn edges_from(&self, node_id: &str) -> Result<Vec<Edge>> {
        Ok(self.collect(&self.outgoing, node_id))
    }

    async fn edges_to(&self, node_id: &str) -> Result<Vec<Edge>> {
        Ok(self.collect(&self.incoming, node_id))
    }

    async fn count_edges(&self) -> Result<usize> {
        Ok(self.edges.len())
    }

    async fn edge_type_counts(&self) -> Result<HashMap<EdgeType, usize>> {
        let mut counts = HashMap::new();
        for edge in &self.edges {
            *counts.entry(edge.edge_type).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn degree(&self, node_id: &str) -> Result<usize> {
        let out = self.outgoing.get(node_id).map_or(0, Vec::len);
        let inc = self.incoming.get(node_id).map_or(0, Vec::len);
        Ok(out + inc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Page;

    fn graph() -> InMemoryGraph {
        let mut g = InMemoryGraph::new();
        g.add_node(Node::new("a", NodeType::Person, "A"));
        g.add_node(Node::new("b", NodeType::Organization, "B"));
        g.add_node(Node::new("c", NodeType::Event, "C"));
        g.add_edge(Edge::new("e1", "a", "b", EdgeType::AffiliatedWith))
            .unwrap();
        g.add_edge(Edge::new("e2", "a", "c", EdgeType::ParticipatedIn))
            .unwrap();
        g.add_edge(Edge::new("e3", "c", "a", EdgeType::RelatedTo))
            .unwrap();
        g
    }

    #[tokio::test]
    async fn test_edges_by_direction() {
        let g = graph();
        let out: Vec<_> = g.edges_from("a").await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(out, vec!["e1", "e2"]);
        let inc: Vec<_> = g.edges_to("a").await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(inc, vec!["e3"]);
        assert!(g.edges_from("b").await.unwrap().is_empty());
        assert!(g.edges_to("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_paginated_edges() {
        let g = graph();
        let page = g.edges_from_page("a", Page::new(1, 5)).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "e2");
    }

    #[tokio::test]
    async fn test_counts_and_degree() {
        let g = graph();
        assert_eq!(g.count_nodes().await.unwrap(), 3);
        assert_eq!(g.count_edges().await.unwrap(), 3);
        assert_eq!(g.degree("a").await.unwrap(), 3);
        assert_eq!(g.degree("b").await.unwrap(), 1);
        let types = g.edge_type_counts().await.unwrap();
        assert_eq!(types[&EdgeType::RelatedTo], 1);
    }

    #[test]
    fn test_add_edge_rejects_dangling_endpoint() {
        let mut g = graph();
        let err = g
            .add_edge(Edge::new("e9", "a", "zzz", EdgeType::Mentions))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_add_edge_rejects_duplicate_id() {
        let mut g = graph();
        let err = g
            .add_edge(Edge::new("e1", "b", "c", EdgeType::Mentions))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_replacing_node_keeps_order() {
        let mut g = graph();
        g.add_node(Node::new("a", NodeType::Person, "A2"));
        let names: Vec<_> = g.nodes().map(|n| n.name.clone()).collect();
        assert_eq!(names, vec!["A2", "B", "C"]);
    }

    #[tokio::test]
    async fn test_edges_keep_insertion_order() {
        let mut g = graph();
        let ids: Vec<String> = (0..20).map(|_| uuid::Uuid::new_v4().to_string()).collect();
        for id in &ids {
            g.add_edge(Edge::new(id.clone(), "b", "c", EdgeType::Mentions))
                .unwrap();
        }

        let out: Vec<_> = g.edges_from("b").await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(out, ids);
        assert_eq!(g.degree("c").await.unwrap(), 22);
    }
}
