//! Fixed, index-based graph structure for a simulation session.
//!
//! Identity-to-index resolution happens once here. The integrator only ever
//! walks precomputed integer adjacency lists.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::{KuramotoError, Result};
use crate::graph::Graph;

/// Read-only topology: node identities plus symmetric neighbor sets.
///
/// Every index stored in a neighbor set is a valid index into `node_ids`.
/// Self-loops from the input are kept and count towards the degree.
#[derive(Debug, Clone)]
pub struct TopologyModel {
    node_ids: Vec<String>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl TopologyModel {
    /// Builds the topology from a host graph description.
    ///
    /// Duplicate edges collapse into a single neighbor entry.
    pub fn from_graph(graph: &Graph) -> Result<Self> {
        graph.validate()?;

        let index: HashMap<String, usize> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut edges = Vec::with_capacity(graph.edges.len());
        for (a, b) in &graph.edges {
            let ia = *index
                .get(a)
                .ok_or_else(|| KuramotoError::UnknownNode(a.clone()))?;
            let ib = *index
                .get(b)
                .ok_or_else(|| KuramotoError::UnknownNode(b.clone()))?;
            edges.push((ia, ib));
        }

        Ok(Self::assemble(graph.nodes.clone(), index, &edges))
    }

    /// Builds a numbered topology (`"0".."n-1"`) from index pairs.
    pub fn from_index_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self> {
        if n == 0 {
            return Err(KuramotoError::EmptyGraph);
        }
        if let Some(&bad) = edges.iter().flat_map(|(a, b)| [a, b]).find(|&&i| i >= n) {
            return Err(KuramotoError::IndexOutOfRange { index: bad, size: n });
        }

        let node_ids: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        let index = node_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        Ok(Self::assemble(node_ids, index, edges))
    }

    fn assemble(
        node_ids: Vec<String>,
        index: HashMap<String, usize>,
        edges: &[(usize, usize)],
    ) -> Self {
        let mut sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); node_ids.len()];
        let mut unique = BTreeSet::new();

        for &(a, b) in edges {
            sets[a].insert(b);
            sets[b].insert(a);
            unique.insert((a.min(b), a.max(b)));
        }

        let adjacency: Vec<Vec<usize>> = sets
            .into_iter()
            .map(|s| s.into_iter().collect())
            .collect();

        debug!(
            nodes = node_ids.len(),
            edges = unique.len(),
            "Built topology"
        );

        Self {
            node_ids,
            index,
            adjacency,
            edge_count: unique.len(),
        }
    }

    /// Total node count N.
    pub fn size(&self) -> usize {
        self.node_ids.len()
    }

    /// Fixed neighbor set of `index`, sorted ascending.
    pub fn neighbors_of(&self, index: usize) -> Result<&[usize]> {
        self.adjacency
            .get(index)
            .map(Vec::as_slice)
            .ok_or(KuramotoError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Number of neighbors of `index`.
    pub fn degree(&self, index: usize) -> Result<usize> {
        self.neighbors_of(index).map(<[usize]>::len)
    }

    /// True if the node has no neighbors.
    pub fn is_isolated(&self, index: usize) -> Result<bool> {
        self.neighbors_of(index).map(<[usize]>::is_empty)
    }

    /// Identifier of the node at `index`.
    pub fn node_id(&self, index: usize) -> Result<&str> {
        self.node_ids
            .get(index)
            .map(String::as_str)
            .ok_or(KuramotoError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Index of the node with identifier `id`, if present.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// All node identifiers in index order.
    pub fn node_ids(&self) -> &[String] {
        &self.node_ids
    }

    /// Number of distinct undirected edges (self-loops included).
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// All neighbor lists, indexed by node.
    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    /// Distinct undirected edges as `(low, high)` index pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, ns)| ns.iter().filter(move |&&j| j >= i).map(move |&j| (i, j)))
    }
}
