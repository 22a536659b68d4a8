//! Kuramoto Simulation Harness
//!
//! Hosts a [`kuramoto_core`] integrator: builds topologies, samples seeded
//! initial conditions, drives ticks and reports synchrony.
//!
//! # Core Principle: One Seed
//!
//! Every random choice (graph generation, initial phases, natural
//! frequencies, resets) is drawn from `ChaCha8Rng` streams derived from a
//! single 64-bit seed, so a `(graph, seed, config)` triple always replays
//! the same trajectory.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   Graph    ┌──────────────────────────────────────┐
//! │ GraphKind /  │──────────► │              SimSession              │
//! │ load_graph   │            │  Arc<TopologyModel>   ChaCha8Rng     │
//! └──────────────┘            │  KuramotoIntegrator   SyncHistory    │
//!                             └──────────────┬───────────────────────┘
//!                                            │ tick()
//!                    ┌───────────────────────┼───────────────────────┐
//!                    ▼                       ▼                       ▼
//!                 Runner              SyncDashboard             RerunLogger
//!           (batch, SimExport)     (TUI, crossbeam)          (visualization)
//! ```
//!
//! # Usage
//!
//! ```
//! use kuramoto_sim::{GraphKind, GraphSource, Runner, RerunLogger, SimConfig};
//!
//! let config = SimConfig::default().with_nodes(10).with_coupling(2.0);
//! let result = Runner::new(300)
//!     .run_source(&GraphSource::Builtin(GraphKind::Complete), config, &RerunLogger::disabled(), None)
//!     .unwrap();
//!
//! assert!(result.synchronized);
//! ```

pub mod error;
pub mod exporter;
pub mod graphs;
pub mod history;
pub mod loader;
pub mod runner;
pub mod session;
pub mod visualizer;

#[cfg(feature = "dashboard")]
pub mod dashboard;

pub use error::{LoadError, SimError};
pub use exporter::{SimExport, SimFrame};
pub use graphs::GraphKind;
pub use history::{SyncHistory, SyncSample};
pub use loader::{load_graph, parse_edge_list};
pub use runner::{GraphSource, RunResult, Runner, DEFAULT_SYNC_THRESHOLD};
pub use session::{SimConfig, SimSession, TickReport};
pub use visualizer::RerunLogger;
