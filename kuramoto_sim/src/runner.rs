//! Runner - drives a session for a fixed number of ticks.

use std::path::PathBuf;
use std::time::Duration;

use kuramoto_core::{mean_phase, Graph};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SimError;
use crate::exporter::{SimExport, SimFrame};
use crate::graphs::GraphKind;
use crate::loader::load_graph;
use crate::session::{graph_seed, SimConfig, SimSession};
use crate::visualizer::RerunLogger;

/// Default r at or above which a run counts as synchronized.
pub const DEFAULT_SYNC_THRESHOLD: f64 = 0.9;

/// Where the topology comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphSource {
    /// Built-in generator with `SimConfig::nodes` nodes
    Builtin(GraphKind),

    /// Graph file (JSON or edge list)
    File(PathBuf),
}

impl GraphSource {
    /// Short label used in logs and exports.
    pub fn label(&self) -> String {
        match self {
            GraphSource::Builtin(kind) => kind.name().to_string(),
            GraphSource::File(path) => path.display().to_string(),
        }
    }

    /// Produces the graph description; generators are seeded from `config.seed`.
    pub fn resolve(&self, config: &SimConfig) -> Result<Graph, SimError> {
        match self {
            GraphSource::Builtin(kind) => {
                let mut rng = ChaCha8Rng::seed_from_u64(graph_seed(config.seed));
                kind.build(config.nodes, &mut rng)
            }
            GraphSource::File(path) => Ok(load_graph(path)?),
        }
    }
}

/// Results from a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Graph that was simulated
    pub graph: String,

    /// Seed used
    pub seed: u64,

    /// Node count
    pub nodes: usize,

    /// Total ticks executed
    pub ticks: u64,

    /// Coupling strength at the end of the run
    pub coupling: f64,

    /// r after the last tick
    pub final_order_parameter: f64,

    /// Mean r over every tick of the run
    pub mean_order_parameter: f64,

    /// Largest r seen
    pub peak_order_parameter: f64,

    /// Whether final r reached the sync threshold
    pub synchronized: bool,
}

/// Runs sessions for a fixed tick budget.
#[derive(Debug, Clone)]
pub struct Runner {
    /// Ticks per run
    ticks: u64,

    /// Export/visualize every N ticks
    export_interval: u64,

    /// Final r needed to count as synchronized
    sync_threshold: f64,

    /// Wall-clock pacing between ticks (None = as fast as possible)
    pace: Option<Duration>,
}

impl Runner {
    /// Creates a new runner.
    pub fn new(ticks: u64) -> Self {
        Self {
            ticks,
            export_interval: 1,
            sync_threshold: DEFAULT_SYNC_THRESHOLD,
            pace: None,
        }
    }

    /// Sets the frame interval for export and visualization.
    pub fn with_export_interval(mut self, every: u64) -> Self {
        self.export_interval = every.max(1);
        self
    }

    /// Sets the synchronization threshold.
    pub fn with_sync_threshold(mut self, threshold: f64) -> Self {
        self.sync_threshold = threshold;
        self
    }

    /// Paces ticks on a wall-clock interval.
    pub fn with_pacing(mut self, interval: Duration) -> Self {
        self.pace = if interval.is_zero() { None } else { Some(interval) };
        self
    }

    /// Builds a session for `source` and runs it.
    pub fn run_source(
        &self,
        source: &GraphSource,
        config: SimConfig,
        logger: &RerunLogger,
        export: Option<&mut SimExport>,
    ) -> Result<RunResult, SimError> {
        let graph = source.resolve(&config)?;
        let mut session = SimSession::new(&graph, config)?;
        Ok(self.run(&mut session, &source.label(), logger, export))
    }

    /// Runs `session` for the configured number of ticks.
    pub fn run(
        &self,
        session: &mut SimSession,
        label: &str,
        logger: &RerunLogger,
        mut export: Option<&mut SimExport>,
    ) -> RunResult {
        info!(
            "Starting run: {} (seed={}, K={}, ticks={})",
            label,
            session.config().seed,
            session.coupling(),
            self.ticks
        );

        let topology = session.topology().clone();
        let edges: Vec<(usize, usize)> = topology.edges().collect();
        logger.log_topology(topology.size(), &edges);
        if let Some(export) = export.as_deref_mut() {
            export.set_topology(topology.node_ids(), edges.iter().copied());
        }

        let ticker = self.pace.map(crossbeam::channel::tick);

        let mut sum = 0.0;
        let mut peak = session.order_parameter();
        let mut last = peak;

        for i in 0..self.ticks {
            if let Some(ref ticker) = ticker {
                let _ = ticker.recv();
            }

            let report = session.tick();
            sum += report.order_parameter;
            peak = peak.max(report.order_parameter);
            last = report.order_parameter;

            if i % self.export_interval == 0 || i + 1 == self.ticks {
                logger.set_tick(report.tick);
                logger.log_phases(session.phase());
                logger.log_order_parameter(report.order_parameter, mean_phase(session.phase()));

                if let Some(export) = export.as_deref_mut() {
                    export.add_frame(SimFrame {
                        tick: report.tick,
                        time: session.time(),
                        coupling: report.coupling,
                        order_parameter: report.order_parameter,
                        phases: session.phase().to_vec(),
                    });
                }
            }

            if report.tick % 100 == 0 {
                debug!("  tick={} | t={:.1} | r={:.4}", report.tick, session.time(), last);
            }
        }

        if let Some(export) = export {
            export.finalize(last);
        }

        let synchronized = last >= self.sync_threshold;
        info!(
            "✓ {} complete: r={:.4} (mean {:.4}, peak {:.4}){}",
            label,
            last,
            if self.ticks > 0 { sum / self.ticks as f64 } else { last },
            peak,
            if synchronized { " - synchronized" } else { "" }
        );

        RunResult {
            graph: label.to_string(),
            seed: session.config().seed,
            nodes: topology.size(),
            ticks: self.ticks,
            coupling: session.coupling(),
            final_order_parameter: last,
            mean_order_parameter: if self.ticks > 0 { sum / self.ticks as f64 } else { last },
            peak_order_parameter: peak,
            synchronized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> SimConfig {
        SimConfig::default().with_nodes(12)
    }

    #[test]
    fn test_complete_graph_run_synchronizes() {
        let runner = Runner::new(400);
        let result = runner
            .run_source(
                &GraphSource::Builtin(GraphKind::Complete),
                config().with_coupling(2.0),
                &RerunLogger::disabled(),
                None,
            )
            .unwrap();

        assert!(result.synchronized, "r={}", result.final_order_parameter);
        assert_eq!(result.ticks, 400);
        assert_eq!(result.nodes, 12);
        assert!(result.peak_order_parameter >= result.final_order_parameter);
    }

    #[test]
    fn test_isolated_zero_frequency_stays_put() {
        let runner = Runner::new(50);
        let source = GraphSource::Builtin(GraphKind::Isolated);
        let graph = source.resolve(&config()).unwrap();
        let mut session = SimSession::new(&graph, config().with_coupling(3.0)).unwrap();
        let initial = session.phase().to_vec();

        let result = runner.run(&mut session, "isolated", &RerunLogger::disabled(), None);

        assert_eq!(session.phase(), initial.as_slice());
        assert_relative_eq!(
            result.mean_order_parameter,
            result.final_order_parameter,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_run_is_deterministic() {
        let runner = Runner::new(100);
        let source = GraphSource::Builtin(GraphKind::Random);
        let logger = RerunLogger::disabled();

        let a = runner.run_source(&source, config(), &logger, None).unwrap();
        let b = runner.run_source(&source, config(), &logger, None).unwrap();

        assert_eq!(a.final_order_parameter, b.final_order_parameter);
        assert_eq!(a.mean_order_parameter, b.mean_order_parameter);
    }

    #[test]
    fn test_export_frames() {
        let runner = Runner::new(25).with_export_interval(10);
        let mut export = SimExport::new("ring", 42, 0.1);

        let result = runner
            .run_source(
                &GraphSource::Builtin(GraphKind::Ring),
                config(),
                &RerunLogger::disabled(),
                Some(&mut export),
            )
            .unwrap();

        // Ticks 1, 11, 21 plus the final tick 25
        let ticks: Vec<u64> = export.frames.iter().map(|f| f.tick).collect();
        assert_eq!(ticks, vec![1, 11, 21, 25]);
        assert_eq!(export.node_ids.len(), 12);
        assert_eq!(export.edges.len(), 12);
        assert_eq!(export.final_order_parameter, Some(result.final_order_parameter));
        assert!(export.frames.iter().all(|f| f.phases.len() == 12));
    }

    #[test]
    fn test_paced_run() {
        let runner = Runner::new(3).with_pacing(Duration::from_millis(1));
        let result = runner
            .run_source(
                &GraphSource::Builtin(GraphKind::Path),
                config(),
                &RerunLogger::disabled(),
                None,
            )
            .unwrap();
        assert_eq!(result.ticks, 3);
    }

    #[test]
    fn test_missing_file_source() {
        let source = GraphSource::File(PathBuf::from("/no/such/graph.json"));
        let err = Runner::new(1)
            .run_source(&source, config(), &RerunLogger::disabled(), None)
            .unwrap_err();
        assert!(matches!(err, SimError::Load(_)));
    }
}
