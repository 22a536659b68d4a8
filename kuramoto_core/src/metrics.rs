//! Synchrony metrics
//! =================
//!
//! - **Order parameter** r = |⟨e^{iθ}⟩|: 1 for perfect synchrony, ≈0 for
//!   phases spread evenly around the circle.
//! - **Mean phase** ψ = arg⟨e^{iθ}⟩: the collective phase, undefined when r≈0.
//! - **Phase wrapping** into [0, 2π) with Euclidean (never negative) modulo.

use std::f64::consts::TAU;

use nalgebra::Complex;

/// Below this r the mean phase is considered undefined.
pub const MEAN_PHASE_EPSILON: f64 = 1e-12;

/// Wraps an angle into `[0, 2π)`.
///
/// Uses Euclidean remainder so negative inputs land in range. Inputs a hair
/// below a multiple of 2π can round to exactly 2π; those fold to 0.
pub fn wrap_phase(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Sum of unit phasors e^{iθ} over all phases.
fn phasor_sum(phase: &[f64]) -> Complex<f64> {
    phase
        .iter()
        .fold(Complex::new(0.0, 0.0), |acc, &th| acc + Complex::from_polar(1.0, th))
}

/// Kuramoto order parameter r = |Σ e^{iθ}| / N.
///
/// Returns 0 for an empty slice. Clamped to [0, 1] against rounding.
pub fn order_parameter(phase: &[f64]) -> f64 {
    if phase.is_empty() {
        return 0.0;
    }
    let r = phasor_sum(phase).norm() / phase.len() as f64;
    r.clamp(0.0, 1.0)
}

/// Collective phase ψ in `[0, 2π)`, or `None` when the ensemble is incoherent.
pub fn mean_phase(phase: &[f64]) -> Option<f64> {
    if phase.is_empty() {
        return None;
    }
    let mean = phasor_sum(phase) / phase.len() as f64;
    if mean.norm() < MEAN_PHASE_EPSILON {
        return None;
    }
    Some(wrap_phase(mean.arg()))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_perfect_sync() {
        let r = order_parameter(&[1.3; 16]);
        assert_relative_eq!(r, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_even_spread_is_incoherent() {
        for n in 2..12 {
            let phase: Vec<f64> = (0..n).map(|k| TAU * k as f64 / n as f64).collect();
            assert!(order_parameter(&phase) < 1e-9, "n={n}");
            assert_eq!(mean_phase(&phase), None);
        }
    }

    #[test]
    fn test_half_split() {
        // Two antipodal clusters cancel out
        let r = order_parameter(&[0.0, 0.0, std::f64::consts::PI, std::f64::consts::PI]);
        assert!(r < 1e-12);
    }

    #[test]
    fn test_empty_order_parameter() {
        assert_eq!(order_parameter(&[]), 0.0);
        assert_eq!(mean_phase(&[]), None);
    }

    #[test]
    fn test_mean_phase_of_cluster() {
        let psi = mean_phase(&[0.4, 0.5, 0.6]).unwrap();
        assert_relative_eq!(psi, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_phase_across_zero() {
        // Cluster straddling 0 / 2π should average near 0, not near π
        let psi = mean_phase(&[TAU - 0.1, 0.1]).unwrap();
        assert!(psi < 1e-9 || TAU - psi < 1e-9, "psi={psi}");
    }

    #[test]
    fn test_wrap_negative() {
        let w = wrap_phase(-0.1);
        assert!(w >= TAU - 0.1 - 1e-12 && w < TAU, "w={w}");
    }

    #[test]
    fn test_wrap_identity_in_range() {
        assert_eq!(wrap_phase(0.0), 0.0);
        assert_eq!(wrap_phase(1.5), 1.5);
        assert_relative_eq!(wrap_phase(TAU + 1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wrap_rounding_edge() {
        let w = wrap_phase(-1e-18);
        assert!((0.0..TAU).contains(&w));
    }

    proptest! {
        #[test]
        fn prop_order_parameter_bounded(phase in prop::collection::vec(-100.0f64..100.0, 1..64)) {
            let r = order_parameter(&phase);
            prop_assert!((0.0..=1.0).contains(&r));
        }

        #[test]
        fn prop_wrap_in_range(theta in -1.0e6f64..1.0e6) {
            let w = wrap_phase(theta);
            prop_assert!(w >= 0.0 && w < TAU);
        }
    }
}
