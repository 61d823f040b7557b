//! Gait detection from 3-axis acceleration magnitude

use crate::numeric::{find_peaks, peak_threshold};

/// Step count and cadence for one window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GaitFeatures {
    pub steps: usize,
    /// Steps per minute
    pub cadence: f64,
}

/// Euclidean norm of each (x, y, z) sample
pub fn magnitude(x: &[f64], y: &[f64], z: &[f64]) -> Vec<f64> {
    x.iter()
        .zip(y)
        .zip(z)
        .map(|((a, b), c)| (a * a + b * b + c * c).sqrt())
        .collect()
}

/// Count magnitude peaks above `mean + std` and convert to steps per minute.
///
/// Duration is `samples / frequency / 60` minutes; an empty window has
/// cadence 0.
pub fn gait_features(x: &[f64], y: &[f64], z: &[f64], frequency: f64) -> GaitFeatures {
    let magnitude = magnitude(x, y, z);
    let steps = find_peaks(&magnitude, peak_threshold(&magnitude)).len();

    let duration_minutes = magnitude.len() as f64 / frequency / 60.0;
    let cadence = if duration_minutes > 0.0 {
        steps as f64 / duration_minutes
    } else {
        0.0
    };

    GaitFeatures { steps, cadence }
}
