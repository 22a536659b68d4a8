//! Built-in graph generators.

use kuramoto_core::Graph;
use rand::Rng;

use crate::error::SimError;

/// Default edge probability for `random` graphs.
pub const DEFAULT_EDGE_PROBABILITY: f64 = 0.1;

/// Built-in topologies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    /// 0 - 1 - 2 - ... - (n-1)
    Path,

    /// Path with the ends joined
    Ring,

    /// Node 0 connected to every other node
    Star,

    /// Every pair connected
    Complete,

    /// Square lattice, side ⌈√n⌉, last row may be partial
    Grid,

    /// Erdős–Rényi G(n, p)
    Random,

    /// No edges: every oscillator drifts freely
    Isolated,
}

impl GraphKind {
    /// Returns a list of all graph kinds.
    pub fn all() -> Vec<GraphKind> {
        vec![
            GraphKind::Path,
            GraphKind::Ring,
            GraphKind::Star,
            GraphKind::Complete,
            GraphKind::Grid,
            GraphKind::Random,
            GraphKind::Isolated,
        ]
    }

    /// Returns the graph name.
    pub fn name(&self) -> &'static str {
        match self {
            GraphKind::Path => "path",
            GraphKind::Ring => "ring",
            GraphKind::Star => "star",
            GraphKind::Complete => "complete",
            GraphKind::Grid => "grid",
            GraphKind::Random => "random",
            GraphKind::Isolated => "isolated",
        }
    }

    /// Returns a description of the graph.
    pub fn description(&self) -> &'static str {
        match self {
            GraphKind::Path => "Open chain, slowest to synchronize",
            GraphKind::Ring => "Closed chain, admits twisted states",
            GraphKind::Star => "Hub and spokes",
            GraphKind::Complete => "All-to-all, classic mean-field Kuramoto",
            GraphKind::Grid => "2D lattice with 4-neighborhoods",
            GraphKind::Random => "Erdős–Rényi random graph",
            GraphKind::Isolated => "No coupling at all",
        }
    }

    /// Builds a numbered graph with `n` nodes.
    ///
    /// Only `Random` draws from `rng`.
    pub fn build<R: Rng>(&self, n: usize, rng: &mut R) -> Result<Graph, SimError> {
        if n == 0 {
            return Err(SimError::graph(format!("{} graph needs at least one node", self)));
        }

        let mut g = Graph::with_numbered_nodes(n);
        match self {
            GraphKind::Path => {
                for i in 1..n {
                    g.add_indexed_edge(i - 1, i);
                }
            }
            GraphKind::Ring => {
                for i in 1..n {
                    g.add_indexed_edge(i - 1, i);
                }
                // Two nodes already share the only possible edge
                if n > 2 {
                    g.add_indexed_edge(n - 1, 0);
                }
            }
            GraphKind::Star => {
                for i in 1..n {
                    g.add_indexed_edge(0, i);
                }
            }
            GraphKind::Complete => {
                for i in 0..n {
                    for j in (i + 1)..n {
                        g.add_indexed_edge(i, j);
                    }
                }
            }
            GraphKind::Grid => {
                let side = (n as f64).sqrt().ceil() as usize;
                for i in 0..n {
                    if i % side + 1 < side && i + 1 < n {
                        g.add_indexed_edge(i, i + 1);
                    }
                    if i + side < n {
                        g.add_indexed_edge(i, i + side);
                    }
                }
            }
            GraphKind::Random => {
                for i in 0..n {
                    for j in (i + 1)..n {
                        if rng.gen_bool(DEFAULT_EDGE_PROBABILITY) {
                            g.add_indexed_edge(i, j);
                        }
                    }
                }
            }
            GraphKind::Isolated => {}
        }
        Ok(g)
    }
}

impl std::fmt::Display for GraphKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for GraphKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "path" | "line" | "chain" => Ok(GraphKind::Path),
            "ring" | "cycle" => Ok(GraphKind::Ring),
            "star" | "hub" => Ok(GraphKind::Star),
            "complete" | "full" | "all_to_all" => Ok(GraphKind::Complete),
            "grid" | "lattice" => Ok(GraphKind::Grid),
            "random" | "erdos_renyi" | "er" => Ok(GraphKind::Random),
            "isolated" | "empty" => Ok(GraphKind::Isolated),
            _ => Err(format!("Unknown graph: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuramoto_core::TopologyModel;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn topo(kind: GraphKind, n: usize) -> TopologyModel {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        TopologyModel::from_graph(&kind.build(n, &mut rng).unwrap()).unwrap()
    }

    #[test]
    fn test_edge_counts() {
        assert_eq!(topo(GraphKind::Path, 10).edge_count(), 9);
        assert_eq!(topo(GraphKind::Ring, 10).edge_count(), 10);
        assert_eq!(topo(GraphKind::Star, 10).edge_count(), 9);
        assert_eq!(topo(GraphKind::Complete, 10).edge_count(), 45);
        assert_eq!(topo(GraphKind::Isolated, 10).edge_count(), 0);
    }

    #[test]
    fn test_small_rings() {
        assert_eq!(topo(GraphKind::Ring, 1).edge_count(), 0);
        assert_eq!(topo(GraphKind::Ring, 2).edge_count(), 1);
        assert_eq!(topo(GraphKind::Ring, 3).edge_count(), 3);
    }

    #[test]
    fn test_grid_neighbors() {
        // 3x3 lattice: center has 4 neighbors, corner has 2
        let t = topo(GraphKind::Grid, 9);
        assert_eq!(t.degree(4).unwrap(), 4);
        assert_eq!(t.degree(0).unwrap(), 2);
        assert_eq!(t.edge_count(), 12);
    }

    #[test]
    fn test_partial_grid() {
        // Side 3, last row holds a single node under node 3
        let t = topo(GraphKind::Grid, 7);
        assert_eq!(t.neighbors_of(6).unwrap(), &[3]);
    }

    #[test]
    fn test_random_is_seeded() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);

        let ga = GraphKind::Random.build(40, &mut a).unwrap();
        let gb = GraphKind::Random.build(40, &mut b).unwrap();

        assert_eq!(ga, gb);
        assert!(ga.edge_count() > 0);
    }

    #[test]
    fn test_zero_nodes_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(GraphKind::Path.build(0, &mut rng).is_err());
    }

    #[test]
    fn test_parse_names() {
        for kind in GraphKind::all() {
            assert_eq!(kind.name().parse::<GraphKind>().unwrap(), kind);
        }
        assert_eq!("CYCLE".parse::<GraphKind>().unwrap(), GraphKind::Ring);
        assert!("hypercube".parse::<GraphKind>().is_err());
    }
}
