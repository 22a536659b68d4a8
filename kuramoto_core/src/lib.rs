//! Kuramoto Core - phase oscillators coupled over a fixed graph
//!
//! Two pieces, both free of I/O and scheduling:
//! 1. **TopologyModel**: node identities and integer-indexed neighbor sets,
//!    resolved once from a host [`Graph`] and read-only afterwards
//! 2. **KuramotoIntegrator**: the phase and natural-frequency vectors, advanced
//!    by an explicit Euler step; reports the order parameter after each step
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use kuramoto_core::{KuramotoIntegrator, TopologyModel};
//!
//! let topology = Arc::new(TopologyModel::from_index_edges(3, &[(0, 1), (1, 2)]).unwrap());
//! let mut integrator = KuramotoIntegrator::new(topology, vec![0.0, 3.1, 2.1], 0.1).unwrap();
//!
//! let out = integrator.step(1.0);
//! assert!(out.order_parameter >= 0.0 && out.order_parameter <= 1.0);
//! assert_eq!(integrator.current_tick(), 1);
//! ```

pub mod error;
pub mod graph;
pub mod integrator;
pub mod metrics;
pub mod topology;

// Re-export key types for convenience
pub use error::{KuramotoError, Result};
pub use graph::Graph;
pub use integrator::{KuramotoIntegrator, StepOutput};
pub use metrics::{mean_phase, order_parameter, wrap_phase};
pub use topology::TopologyModel;
