//! Rerun visualization for live simulations.
//!
//! This module provides visualization of simulation runs using the Rerun SDK.
//! Visualization is optional and only available with the `visualization` feature.
//!
//! # What Gets Logged
//!
//! - Network nodes on a circular layout, colored by phase
//! - Edges as line strips (logged once, static)
//! - Every oscillator as a point on the unit circle plus the mean-field arrow
//! - Order parameter r as a scalar on the `tick` timeline

use nalgebra::Vector2;
use std::f64::consts::TAU;

#[cfg(feature = "visualization")]
use rerun::{Arrows2D, Color, LineStrips2D, Points2D, Position2D, Radius, RecordingStream};

/// Node positions evenly spaced on the unit circle, node 0 at angle 0.
pub fn circular_layout(n: usize) -> Vec<Vector2<f64>> {
    (0..n)
        .map(|i| {
            let a = TAU * i as f64 / n.max(1) as f64;
            Vector2::new(a.cos(), a.sin())
        })
        .collect()
}

/// Maps a phase onto a hue wheel, so 0 and 2π get the same color.
pub fn phase_color(theta: f64) -> [u8; 3] {
    let h = theta.rem_euclid(TAU) / TAU * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// Rerun logger for simulation visualization.
pub struct RerunLogger {
    #[cfg(feature = "visualization")]
    rec: Option<RecordingStream>,

    /// Whether visualization is enabled
    enabled: bool,
}

impl RerunLogger {
    /// Creates a new logger with visualization disabled.
    pub fn disabled() -> Self {
        Self {
            #[cfg(feature = "visualization")]
            rec: None,
            enabled: false,
        }
    }

    /// Creates a new logger with visualization enabled.
    #[cfg(feature = "visualization")]
    pub fn new(name: &str) -> Self {
        match rerun::RecordingStreamBuilder::new(name).spawn() {
            Ok(rec) => {
                tracing::info!("Rerun visualization enabled - open Rerun Viewer to see simulation");
                Self {
                    rec: Some(rec),
                    enabled: true,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to initialize Rerun: {:?}", e);
                Self::disabled()
            }
        }
    }

    /// Creates a logger - returns disabled if visualization feature not enabled.
    #[cfg(not(feature = "visualization"))]
    pub fn new(_name: &str) -> Self {
        tracing::info!("Rerun visualization not available (compile with --features visualization)");
        Self::disabled()
    }

    /// Returns whether visualization is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the tick for subsequent logs.
    #[cfg(feature = "visualization")]
    pub fn set_tick(&self, tick: u64) {
        if let Some(ref rec) = self.rec {
            rec.set_time_sequence("tick", tick as i64);
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn set_tick(&self, _tick: u64) {}

    /// Logs the graph edges on the circular layout.
    #[cfg(feature = "visualization")]
    pub fn log_topology(&self, n: usize, edges: &[(usize, usize)]) {
        if let Some(ref rec) = self.rec {
            let layout = circular_layout(n);
            let strips: Vec<Vec<[f32; 2]>> = edges
                .iter()
                .map(|&(a, b)| {
                    vec![
                        [layout[a].x as f32, layout[a].y as f32],
                        [layout[b].x as f32, layout[b].y as f32],
                    ]
                })
                .collect();

            let _ = rec.log_static(
                "network/edges",
                &LineStrips2D::new(strips).with_colors([Color::from_rgb(128, 128, 128)]),
            );
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_topology(&self, _n: usize, _edges: &[(usize, usize)]) {}

    /// Logs node colors on the layout and oscillators on the phase circle.
    #[cfg(feature = "visualization")]
    pub fn log_phases(&self, phases: &[f64]) {
        if let Some(ref rec) = self.rec {
            let colors: Vec<Color> = phases
                .iter()
                .map(|&th| {
                    let [r, g, b] = phase_color(th);
                    Color::from_rgb(r, g, b)
                })
                .collect();

            let nodes: Vec<Position2D> = circular_layout(phases.len())
                .iter()
                .map(|p| Position2D::new(p.x as f32, p.y as f32))
                .collect();
            let _ = rec.log(
                "network/nodes",
                &Points2D::new(nodes)
                    .with_colors(colors.clone())
                    .with_radii([Radius::new_scene_units(0.05)]),
            );

            let on_circle: Vec<Position2D> = phases
                .iter()
                .map(|&th| Position2D::new(th.cos() as f32, th.sin() as f32))
                .collect();
            let _ = rec.log(
                "phase_circle/oscillators",
                &Points2D::new(on_circle)
                    .with_colors(colors)
                    .with_radii([Radius::new_scene_units(0.04)]),
            );
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_phases(&self, _phases: &[f64]) {}

    /// Logs the mean-field vector r·e^{iψ} and r as a scalar.
    #[cfg(feature = "visualization")]
    pub fn log_order_parameter(&self, order_parameter: f64, mean_phase: Option<f64>) {
        if let Some(ref rec) = self.rec {
            let psi = mean_phase.unwrap_or(0.0);
            let _ = rec.log(
                "phase_circle/mean_field",
                &Arrows2D::from_vectors([[
                    (order_parameter * psi.cos()) as f32,
                    (order_parameter * psi.sin()) as f32,
                ]])
                .with_colors([Color::from_rgb(255, 0, 0)]),
            );
            let _ = rec.log("metrics/order_parameter", &rerun::Scalar::new(order_parameter));
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_order_parameter(&self, _order_parameter: f64, _mean_phase: Option<f64>) {}

    /// Logs a text annotation (e.g., reset or coupling change).
    #[cfg(feature = "visualization")]
    pub fn log_event(&self, message: &str) {
        if let Some(ref rec) = self.rec {
            let _ = rec.log("events", &rerun::TextLog::new(message));
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_event(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_logger() {
        let logger = RerunLogger::disabled();
        assert!(!logger.is_enabled());

        // These should be no-ops
        logger.set_tick(1);
        logger.log_topology(2, &[(0, 1)]);
        logger.log_phases(&[0.0, 1.0]);
        logger.log_order_parameter(0.5, Some(0.2));
        logger.log_event("reset");
    }

    #[test]
    fn test_circular_layout() {
        let layout = circular_layout(4);
        assert_eq!(layout.len(), 4);
        assert!((layout[0] - Vector2::new(1.0, 0.0)).norm() < 1e-12);
        assert!((layout[1] - Vector2::new(0.0, 1.0)).norm() < 1e-12);
        assert!(layout.iter().all(|p| (p.norm() - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_phase_color_periodic() {
        assert_eq!(phase_color(0.0), [255, 0, 0]);
        assert_eq!(phase_color(TAU), phase_color(0.0));
        assert_eq!(phase_color(-TAU / 3.0), phase_color(2.0 * TAU / 3.0));
        assert_ne!(phase_color(TAU / 3.0), phase_color(0.0));
    }
}
