//! Postural sway from gyroscope point clouds

use crate::numeric::{covariance_2x2, mean, quantile};
use std::f64::consts::PI;

/// Chi-square quantile at 0.95 with two degrees of freedom
pub const CHI2_95_DF2: f64 = 5.991464547107979;

/// Percentile of centroid distances used as the sway sphere radius
const SWAY_RADIUS_PERCENTILE: f64 = 0.95;

/// 95% confidence ellipse area: `pi * chi2 * sqrt(|det(cov)|)`.
///
/// Fewer than two samples have no covariance and give 0.
pub fn ellipse_area(a: &[f64], b: &[f64]) -> f64 {
    match covariance_2x2(a, b) {
        Some(cov) => {
            let det = cov[0][0] * cov[1][1] - cov[0][1] * cov[1][0];
            PI * CHI2_95_DF2 * det.abs().sqrt()
        }
        None => 0.0,
    }
}

/// Volume of the sphere around the centroid enclosing 95% of the points
pub fn sway_volume(x: &[f64], y: &[f64], z: &[f64]) -> f64 {
    let n = x.len().min(y.len()).min(z.len());
    if n == 0 {
        return 0.0;
    }
    let (x, y, z) = (&x[..n], &y[..n], &z[..n]);
    let centroid = [mean(x), mean(y), mean(z)];

    let distances: Vec<f64> = (0..n)
        .map(|i| {
            let dx = x[i] - centroid[0];
            let dy = y[i] - centroid[1];
            let dz = z[i] - centroid[2];
            (dx * dx + dy * dy + dz * dz).sqrt()
        })
        .collect();

    let r = quantile(&distances, SWAY_RADIUS_PERCENTILE);
    4.0 / 3.0 * PI * r.powi(3)
}
