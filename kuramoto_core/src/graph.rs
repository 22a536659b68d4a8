//! Host-supplied graph description.
//!
//! A `Graph` is the loose, identity-keyed form a host reads from a file or
//! generates. It is validated and converted into an index-based
//! [`TopologyModel`](crate::TopologyModel) once, at session start.

use serde::{Deserialize, Serialize};

use crate::error::{KuramotoError, Result};

/// Undirected graph keyed by node identifiers.
///
/// Node order is significant: it defines the index of each oscillator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    /// Node identifiers in index order.
    pub nodes: Vec<String>,

    /// Undirected edges as identifier pairs.
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with nodes named `"0".."n-1"` and no edges.
    pub fn with_numbered_nodes(n: usize) -> Self {
        Self {
            nodes: (0..n).map(|i| i.to_string()).collect(),
            edges: Vec::new(),
        }
    }

    /// Appends a node identifier.
    pub fn add_node(&mut self, id: impl Into<String>) {
        self.nodes.push(id.into());
    }

    /// Appends an undirected edge between two identifiers.
    pub fn add_edge(&mut self, a: impl Into<String>, b: impl Into<String>) {
        self.edges.push((a.into(), b.into()));
    }

    /// Adds an edge between two nodes of a numbered graph.
    pub fn add_indexed_edge(&mut self, a: usize, b: usize) {
        self.add_edge(a.to_string(), b.to_string());
    }

    /// Number of declared nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of declared edges (duplicates included).
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Parses the JSON form `{"nodes": [...], "edges": [["a", "b"], ...]}`.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Checks that identifiers are unique and every edge endpoint is declared.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(KuramotoError::EmptyGraph);
        }

        let mut seen = std::collections::HashSet::with_capacity(self.nodes.len());
        for id in &self.nodes {
            if !seen.insert(id.as_str()) {
                return Err(KuramotoError::DuplicateNode(id.clone()));
            }
        }

        for (a, b) in &self.edges {
            for end in [a, b] {
                if !seen.contains(end.as_str()) {
                    return Err(KuramotoError::UnknownNode(end.clone()));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_graph() {
        let mut g = Graph::with_numbered_nodes(3);
        g.add_indexed_edge(0, 1);

        assert_eq!(g.nodes, vec!["0", "1", "2"]);
        assert_eq!(g.edges, vec![("0".to_string(), "1".to_string())]);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_shape() {
        let json = r#"{"nodes": ["a", "b", "c"], "edges": [["a", "b"], ["b", "c"]]}"#;
        let g = Graph::from_json(json).unwrap();

        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edges[1], ("b".to_string(), "c".to_string()));
    }

    #[test]
    fn test_json_edges_optional() {
        let g = Graph::from_json(r#"{"nodes": ["solo"]}"#).unwrap();
        assert!(g.edges.is_empty());
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert_eq!(Graph::new().validate(), Err(KuramotoError::EmptyGraph));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let mut g = Graph::new();
        g.add_node("x");
        g.add_node("x");

        assert_eq!(
            g.validate(),
            Err(KuramotoError::DuplicateNode("x".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_unknown_endpoint() {
        let mut g = Graph::new();
        g.add_node("x");
        g.add_edge("x", "y");

        assert_eq!(g.validate(), Err(KuramotoError::UnknownNode("y".to_string())));
    }
}
