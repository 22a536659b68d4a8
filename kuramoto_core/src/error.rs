//! Error types for the Kuramoto core.

use thiserror::Error;

/// Errors raised while building a topology or driving the integrator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KuramotoError {
    /// The graph has no nodes; there is nothing to simulate.
    #[error("Graph has no nodes")]
    EmptyGraph,

    /// A node index outside `[0, size)` was queried.
    #[error("Node index {index} out of range for {size} nodes")]
    IndexOutOfRange { index: usize, size: usize },

    /// A per-node vector does not match the node count.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The same node identifier appears twice in the graph description.
    #[error("Duplicate node: {0}")]
    DuplicateNode(String),

    /// An edge references a node that was never declared.
    #[error("Unknown node in edge: {0}")]
    UnknownNode(String),

    /// Time step must be finite and strictly positive.
    #[error("Invalid time step: {0}")]
    InvalidTimeStep(f64),
}

impl KuramotoError {
    /// Creates a dimension mismatch error.
    pub fn dimension(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, KuramotoError>;
