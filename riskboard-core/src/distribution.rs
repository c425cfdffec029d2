//! Distribution Reconstructor
//!
//! Rebuilds a display-only probability-density curve from Monte Carlo
//! summary statistics. This is a shape approximation for area charts: the
//! curve is not re-normalized to integrate to 1 over the window, so the
//! y-axis must not be read as a calibrated probability.
//!
//! Global invariants enforced:
//! - Identical input yields identical output (no clocks, no randomness)
//! - Output is always finite, including the degenerate zero-variance case

use serde::Serialize;
use std::f64::consts::PI;

/// Default number of curve samples (inclusive grid over the interval)
pub const DEFAULT_RESOLUTION: usize = 51;

/// One sample of the reconstructed density curve
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
}

/// Reconstruct a Gaussian density curve over `[low, high]` inclusive
///
/// `resolution` equally spaced samples with step `(high - low) / (resolution
/// - 1)`. A `std_dev` of exactly zero is rendered as a unit impulse at the
/// grid point nearest the mean instead of propagating a division by zero.
pub fn reconstruct(
    mean: f64,
    std_dev: f64,
    interval: [f64; 2],
    resolution: usize,
) -> Vec<DensityPoint> {
    let [low, high] = interval;
    let samples = resolution.max(2);
    let step = (high - low) / (samples - 1) as f64;

    if std_dev == 0.0 {
        return impulse(mean, low, step, samples);
    }

    let norm = std_dev * (2.0 * PI).sqrt();
    (0..samples)
        .map(|i| {
            let x = low + i as f64 * step;
            let z = (x - mean) / std_dev;
            DensityPoint {
                x,
                density: (-0.5 * z * z).exp() / norm,
            }
        })
        .collect()
}

/// Reconstruct with the default 51-point resolution
pub fn reconstruct_default(mean: f64, std_dev: f64, interval: [f64; 2]) -> Vec<DensityPoint> {
    reconstruct(mean, std_dev, interval, DEFAULT_RESOLUTION)
}

fn impulse(mean: f64, low: f64, step: f64, samples: usize) -> Vec<DensityPoint> {
    let peak = if step > 0.0 {
        (((mean - low) / step).round() as isize).clamp(0, samples as isize - 1) as usize
    } else {
        0
    };
    (0..samples)
        .map(|i| DensityPoint {
            x: low + i as f64 * step,
            density: if i == peak { 1.0 } else { 0.0 },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_spans_interval_inclusive() {
        let curve = reconstruct(50.0, 5.0, [40.0, 60.0], 51);
        assert_eq!(curve.len(), 51);
        assert!((curve[0].x - 40.0).abs() < 1e-9);
        assert!((curve[50].x - 60.0).abs() < 1e-9);
        // Equal spacing: (60 - 40) / 50 = 0.4
        assert!((curve[1].x - 40.4).abs() < 1e-9);
    }

    #[test]
    fn test_density_peaks_at_mean() {
        let curve = reconstruct(50.0, 5.0, [40.0, 60.0], 51);
        let peak = curve
            .iter()
            .max_by(|a, b| a.density.partial_cmp(&b.density).unwrap())
            .unwrap();
        assert!((peak.x - 50.0).abs() < 1e-9);
        // Gaussian peak height: 1 / (5 * sqrt(2π)) ≈ 0.0798
        assert!((peak.density - 0.0797884).abs() < 1e-6);
    }

    #[test]
    fn test_zero_std_dev_yields_finite_impulse() {
        let curve = reconstruct(50.0, 0.0, [40.0, 60.0], 51);
        assert_eq!(curve.len(), 51);
        assert!(curve.iter().all(|p| p.density.is_finite()));
        let spikes: Vec<_> = curve.iter().filter(|p| p.density > 0.0).collect();
        assert_eq!(spikes.len(), 1);
        assert!((spikes[0].x - 50.0).abs() < 1e-9);
        assert_eq!(spikes[0].density, 1.0);
    }

    #[test]
    fn test_zero_std_dev_off_center_mean_clamps_into_grid() {
        let curve = reconstruct(60.0, 0.0, [40.0, 50.0], 11);
        assert!(curve.iter().all(|p| p.density.is_finite()));
        // Impulse lands on the nearest in-range grid point
        assert_eq!(curve.last().unwrap().density, 1.0);
    }

    #[test]
    fn test_idempotent_for_identical_inputs() {
        let a = reconstruct(52.5, 4.2, [44.0, 61.0], 51);
        let b = reconstruct(52.5, 4.2, [44.0, 61.0], 51);
        assert_eq!(a, b);
    }

    #[test]
    fn test_resolution_floor_of_two() {
        let curve = reconstruct(5.0, 1.0, [0.0, 10.0], 0);
        assert_eq!(curve.len(), 2);
        assert!((curve[1].x - 10.0).abs() < 1e-9);
    }
}
