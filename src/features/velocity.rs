//! Integrated velocity and angular velocity per axis

use crate::numeric::{cumulative_trapezoid, mean, variance};

/// Mean and population variance of one integrated axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntegratedAxis {
    pub mean: f64,
    pub variance: f64,
}

/// Integrate a rate signal (acceleration or angular rate) with the
/// cumulative trapezoid rule and summarize the result
pub fn integrated_axis(signal: &[f64], dt: f64) -> IntegratedAxis {
    let integrated = cumulative_trapezoid(signal, dt);
    IntegratedAxis {
        mean: mean(&integrated),
        variance: variance(&integrated),
    }
}

/// Summaries for x, y and z, each integrated independently
pub fn integrated_axes(x: &[f64], y: &[f64], z: &[f64], dt: f64) -> [IntegratedAxis; 3] {
    [
        integrated_axis(x, dt),
        integrated_axis(y, dt),
        integrated_axis(z, dt),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_acceleration() {
        // velocity = [0, 1, 2, 3, 4] for c = 10, dt = 0.1
        let axis = integrated_axis(&[10.0; 5], 0.1);
        assert!((axis.mean - 2.0).abs() < 1e-12);
        assert!((axis.variance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_axes_are_independent() {
        let [x, y, z] = integrated_axes(&[0.0; 4], &[1.0; 4], &[-1.0; 4], 1.0);
        assert_eq!(x, IntegratedAxis::default());
        assert!((y.mean - 1.5).abs() < 1e-12);
        assert!((z.mean + 1.5).abs() < 1e-12);
        assert!((y.variance - z.variance).abs() < 1e-12);
    }

    #[test]
    fn test_empty() {
        assert_eq!(integrated_axis(&[], 0.02), IntegratedAxis::default());
    }
}
