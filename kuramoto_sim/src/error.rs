//! Error types for the simulation host.

use kuramoto_core::KuramotoError;
use thiserror::Error;

/// Errors raised while reading a graph file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON graph file is malformed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Edge-list line with more than two tokens
    #[error("Malformed edge list at line {line}: {content}")]
    Malformed { line: usize, content: String },
}

/// Errors that can occur in the simulation host.
#[derive(Debug, Error)]
pub enum SimError {
    /// Topology or integrator rejected its input
    #[error("Model error: {0}")]
    Model(#[from] KuramotoError),

    /// Graph file could not be loaded
    #[error("Graph load error: {0}")]
    Load(#[from] LoadError),

    /// Coupling strength must be a finite real
    #[error("Invalid coupling strength: {0}")]
    InvalidCoupling(f64),

    /// Configuration value out of its domain
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unknown built-in graph or bad generator parameters
    #[error("Graph error: {0}")]
    Graph(String),

    /// Export failed
    #[error("Export error: {0}")]
    Export(#[from] std::io::Error),
}

impl SimError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates a graph error.
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph(msg.into())
    }
}
