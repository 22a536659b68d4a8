//! Explicit Euler integrator for Kuramoto oscillators on a graph:
//!
//!   dθ_i/dt = ω_i + (K / |S_i|) Σ_{j ∈ S_i} sin(θ_j - θ_i)
//!
//! Isolated nodes (|S_i| = 0) get no coupling term and drift at ω_i.
//! Every step reads a start-of-step snapshot and writes into a preallocated
//! scratch buffer, which is then swapped in as a whole.

use std::sync::Arc;

use tracing::debug;

use crate::error::{KuramotoError, Result};
use crate::metrics::{order_parameter, wrap_phase};
use crate::topology::TopologyModel;

/// Result of a single integration step.
#[derive(Debug, Clone, Copy)]
pub struct StepOutput<'a> {
    /// Phases after the step, wrapped into [0, 2π).
    pub phase: &'a [f64],
    /// Order parameter r of the new phases.
    pub order_parameter: f64,
    /// Tick counter after the step.
    pub tick: u64,
}

/// Stateful phase integrator bound to a fixed topology.
///
/// Not internally synchronized: the host serializes `step` and `reset`.
#[derive(Debug, Clone)]
pub struct KuramotoIntegrator {
    topology: Arc<TopologyModel>,
    phase: Vec<f64>,
    natural_frequency: Vec<f64>,
    dt: f64,
    tick: u64,
    // Pre-allocated scratch
    next_phase: Vec<f64>,
}

impl KuramotoIntegrator {
    /// Creates an integrator with identical oscillators (ω = 0).
    ///
    /// `initial_phase` is stored as given; wrapping happens on the first step.
    pub fn new(topology: Arc<TopologyModel>, initial_phase: Vec<f64>, dt: f64) -> Result<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(KuramotoError::InvalidTimeStep(dt));
        }
        let n = topology.size();
        if initial_phase.len() != n {
            return Err(KuramotoError::dimension("phase", n, initial_phase.len()));
        }

        debug!(nodes = n, dt, "Created Kuramoto integrator");

        Ok(Self {
            topology,
            phase: initial_phase,
            natural_frequency: vec![0.0; n],
            dt,
            tick: 0,
            next_phase: vec![0.0; n],
        })
    }

    /// Sets heterogeneous natural frequencies.
    pub fn with_natural_frequency(mut self, natural_frequency: Vec<f64>) -> Result<Self> {
        self.check_len("natural_frequency", &natural_frequency)?;
        self.natural_frequency = natural_frequency;
        Ok(self)
    }

    fn check_len(&self, what: &'static str, v: &[f64]) -> Result<()> {
        let n = self.topology.size();
        if v.len() != n {
            return Err(KuramotoError::dimension(what, n, v.len()));
        }
        Ok(())
    }

    /// Advances every oscillator by one time step with coupling strength `coupling`.
    ///
    /// Negative coupling is anti-coupling. All phases are computed from the
    /// same snapshot, so node order has no influence on the result.
    pub fn step(&mut self, coupling: f64) -> StepOutput<'_> {
        let dt = self.dt;
        let theta = &self.phase;

        for (i, (next, neighbors)) in self
            .next_phase
            .iter_mut()
            .zip(self.topology.adjacency())
            .enumerate()
        {
            let th = theta[i];
            let mut dtheta = self.natural_frequency[i];

            if !neighbors.is_empty() {
                let sum: f64 = neighbors.iter().map(|&j| (theta[j] - th).sin()).sum();
                dtheta += coupling / neighbors.len() as f64 * sum;
            }

            *next = wrap_phase(th + dtheta * dt);
        }

        std::mem::swap(&mut self.phase, &mut self.next_phase);
        self.tick += 1;

        StepOutput {
            phase: &self.phase,
            order_parameter: order_parameter(&self.phase),
            tick: self.tick,
        }
    }

    /// Runs `steps` consecutive steps and returns the final order parameter.
    ///
    /// With `steps == 0` this is the order parameter of the current phases.
    pub fn advance(&mut self, coupling: f64, steps: u64) -> f64 {
        let mut r = self.order_parameter();
        for _ in 0..steps {
            r = self.step(coupling).order_parameter;
        }
        r
    }

    /// Replaces the phase vector (and optionally the natural frequencies) and zeros the tick.
    ///
    /// On a length mismatch nothing changes.
    pub fn reset(
        &mut self,
        new_phase: Vec<f64>,
        new_natural_frequency: Option<Vec<f64>>,
    ) -> Result<()> {
        self.check_len("phase", &new_phase)?;
        if let Some(ref omega) = new_natural_frequency {
            self.check_len("natural_frequency", omega)?;
        }

        self.phase = new_phase;
        if let Some(omega) = new_natural_frequency {
            self.natural_frequency = omega;
        }
        self.tick = 0;

        debug!(nodes = self.phase.len(), "Integrator reset");
        Ok(())
    }

    /// Number of successful steps since construction or the last reset.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Current phase vector.
    pub fn current_phase(&self) -> &[f64] {
        &self.phase
    }

    /// Natural frequencies ω.
    pub fn natural_frequency(&self) -> &[f64] {
        &self.natural_frequency
    }

    /// Order parameter of the current phases.
    pub fn order_parameter(&self) -> f64 {
        order_parameter(&self.phase)
    }

    /// Fixed time step Δt.
    pub fn time_step(&self) -> f64 {
        self.dt
    }

    /// Simulated time since the last reset (tick × Δt).
    pub fn elapsed_time(&self) -> f64 {
        self.tick as f64 * self.dt
    }

    /// The topology this integrator is bound to.
    pub fn topology(&self) -> &Arc<TopologyModel> {
        &self.topology
    }

    /// Node count N.
    pub fn size(&self) -> usize {
        self.phase.len()
    }
}
