//! SimSession - one live simulation: topology, integrator, seeded RNG and
//! the host-side state a UI needs (coupling knob, synchrony history).

use std::f64::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use kuramoto_core::{Graph, KuramotoIntegrator, TopologyModel};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, Uniform};
use tracing::{debug, info};

use crate::error::SimError;
use crate::history::{SyncHistory, DEFAULT_ROLLOVER, DEFAULT_WINDOW};

/// Lower end of the interactive coupling range.
pub const COUPLING_MIN: f64 = 0.0;

/// Upper end of the interactive coupling range.
pub const COUPLING_MAX: f64 = 5.0;

/// Increment applied by interactive coupling controls.
pub const COUPLING_STEP: f64 = 0.1;

/// Derives the graph-generation seed from the master seed.
///
/// Kept separate from the phase stream so that changing the topology
/// generator doesn't shift the sampled initial phases.
pub fn graph_seed(seed: u64) -> u64 {
    seed.wrapping_mul(0x9e3779b97f4a7c15)
}

/// Configuration for a simulation session.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Node count for generated graphs
    pub nodes: usize,

    /// Integration time step Δt
    pub dt: f64,

    /// Initial coupling strength K
    pub coupling: f64,

    /// Mean natural frequency
    pub omega_mean: f64,

    /// Natural frequency spread (0 = identical oscillators)
    pub omega_std: f64,

    /// Samples retained in the synchrony history
    pub history_len: usize,

    /// Visible chart width in ticks
    pub display_window: u64,

    /// Wall-clock interval between ticks in live mode
    pub tick_interval: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            nodes: 50,
            dt: 0.1,
            coupling: 0.5,
            omega_mean: 0.0,
            omega_std: 0.0,
            history_len: DEFAULT_ROLLOVER,
            display_window: DEFAULT_WINDOW,
            tick_interval: Duration::from_millis(100),
        }
    }
}

impl SimConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_nodes(mut self, nodes: usize) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_coupling(mut self, coupling: f64) -> Self {
        self.coupling = coupling;
        self
    }

    /// Sets the natural frequency distribution N(mean, std²).
    pub fn with_frequencies(mut self, mean: f64, std: f64) -> Self {
        self.omega_mean = mean;
        self.omega_std = std;
        self
    }

    pub fn with_history(mut self, len: usize, window: u64) -> Self {
        self.history_len = len;
        self.display_window = window;
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }
}

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub coupling: f64,
    pub order_parameter: f64,
}

/// A running simulation session.
pub struct SimSession {
    config: SimConfig,
    topology: Arc<TopologyModel>,
    integrator: KuramotoIntegrator,
    rng: ChaCha8Rng,
    coupling: f64,
    history: SyncHistory,
}

impl SimSession {
    /// Builds the topology from `graph` and samples initial conditions.
    pub fn new(graph: &Graph, config: SimConfig) -> Result<Self, SimError> {
        if !config.coupling.is_finite() {
            return Err(SimError::InvalidCoupling(config.coupling));
        }

        let topology = Arc::new(TopologyModel::from_graph(graph)?);
        let n = topology.size();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let phase = sample_phases(&mut rng, n);
        let omega = sample_frequencies(&mut rng, n, config.omega_mean, config.omega_std)?;

        let integrator = KuramotoIntegrator::new(topology.clone(), phase, config.dt)?
            .with_natural_frequency(omega)?;

        info!(
            "Session ready: {} nodes, {} edges, dt={}, K={}",
            n,
            topology.edge_count(),
            config.dt,
            config.coupling
        );

        Ok(Self {
            coupling: config.coupling,
            history: SyncHistory::new(config.history_len, config.display_window),
            config,
            topology,
            integrator,
            rng,
        })
    }

    /// Advances one step with the current coupling and records r.
    pub fn tick(&mut self) -> TickReport {
        let out = self.integrator.step(self.coupling);
        let report = TickReport {
            tick: out.tick,
            coupling: self.coupling,
            order_parameter: out.order_parameter,
        };
        self.history.push(report.tick, report.order_parameter);
        report
    }

    /// Sets the coupling used by subsequent ticks. Any finite value is accepted.
    pub fn set_coupling(&mut self, coupling: f64) -> Result<(), SimError> {
        if !coupling.is_finite() {
            return Err(SimError::InvalidCoupling(coupling));
        }
        self.coupling = coupling;
        Ok(())
    }

    /// Nudges the coupling, clamped to `[COUPLING_MIN, COUPLING_MAX]`.
    pub fn adjust_coupling(&mut self, delta: f64) -> f64 {
        let k = (self.coupling + delta).clamp(COUPLING_MIN, COUPLING_MAX);
        // Snap to the control grid so repeated nudges don't accumulate error
        self.coupling = (k / COUPLING_STEP).round() * COUPLING_STEP;
        self.coupling
    }

    /// Restarts from fresh uniform random phases; frequencies are kept.
    pub fn reset(&mut self) -> Result<(), SimError> {
        let phase = sample_phases(&mut self.rng, self.topology.size());
        self.reset_with(phase)
    }

    /// Restarts from the given phases; frequencies are kept.
    pub fn reset_with(&mut self, phase: Vec<f64>) -> Result<(), SimError> {
        self.integrator.reset(phase, None)?;
        self.history.clear();
        debug!("Session reset (r={:.3})", self.integrator.order_parameter());
        Ok(())
    }

    pub fn phase(&self) -> &[f64] {
        self.integrator.current_phase()
    }

    pub fn order_parameter(&self) -> f64 {
        self.integrator.order_parameter()
    }

    pub fn coupling(&self) -> f64 {
        self.coupling
    }

    pub fn tick_count(&self) -> u64 {
        self.integrator.current_tick()
    }

    /// Simulated time since the last reset.
    pub fn time(&self) -> f64 {
        self.integrator.elapsed_time()
    }

    pub fn topology(&self) -> &Arc<TopologyModel> {
        &self.topology
    }

    pub fn integrator(&self) -> &KuramotoIntegrator {
        &self.integrator
    }

    pub fn history(&self) -> &SyncHistory {
        &self.history
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

/// Uniform phases over `[0, 2π)`.
pub fn sample_phases(rng: &mut ChaCha8Rng, n: usize) -> Vec<f64> {
    let dist = Uniform::new(0.0, TAU);
    (0..n).map(|_| dist.sample(rng)).collect()
}

/// Natural frequencies from N(mean, std²); all equal to `mean` when `std == 0`.
pub fn sample_frequencies(
    rng: &mut ChaCha8Rng,
    n: usize,
    mean: f64,
    std: f64,
) -> Result<Vec<f64>, SimError> {
    if !mean.is_finite() {
        return Err(SimError::config(format!("omega mean must be finite, got {}", mean)));
    }
    if !std.is_finite() || std < 0.0 {
        return Err(SimError::config(format!(
            "omega std must be finite and non-negative, got {}",
            std
        )));
    }
    if std == 0.0 {
        return Ok(vec![mean; n]);
    }
    let normal = Normal::new(mean, std)
        .map_err(|e| SimError::config(format!("omega std {}: {}", std, e)))?;
    Ok((0..n).map(|_| normal.sample(rng)).collect())
}
