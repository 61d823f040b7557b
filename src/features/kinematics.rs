//! Step kinematics from a single acceleration axis
//!
//! Velocity comes from the mean-detrended signal; steps are peaks of the raw
//! signal. Fewer than two peaks leave every feature at 0.

use crate::numeric::{
    cumulative_trapezoid, find_peaks, mean, mean_absolute_deviation, peak_threshold, trapezoid,
};

/// Velocity and step timing features for one window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepKinematics {
    pub avg_velocity: f64,
    pub residual_step_length: f64,
    pub avg_step_time: f64,
    pub residual_step_time: f64,
}

/// Velocity series of a detrended acceleration signal
pub fn velocity(signal: &[f64], dt: f64) -> Vec<f64> {
    let m = mean(signal);
    let detrended: Vec<f64> = signal.iter().map(|v| v - m).collect();
    cumulative_trapezoid(&detrended, dt)
}

/// Step features of one window sampled every `dt` seconds.
///
/// `avg_velocity` is the trapezoid integral of the whole velocity series
/// divided by the window duration, not the last cumulative velocity sample.
pub fn step_kinematics(signal: &[f64], dt: f64) -> StepKinematics {
    let peaks = find_peaks(signal, peak_threshold(signal));
    if peaks.len() < 2 {
        return StepKinematics::default();
    }

    let velocity = velocity(signal, dt);

    let step_lengths: Vec<f64> = peaks
        .windows(2)
        .map(|pair| trapezoid(&velocity[pair[0]..pair[1]], dt))
        .collect();
    let step_times: Vec<f64> = peaks
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f64 * dt)
        .collect();

    let total_displacement = trapezoid(&velocity, dt);
    let total_time = signal.len() as f64 * dt;
    let avg_velocity = if total_time > 0.0 {
        total_displacement / total_time
    } else {
        0.0
    };

    StepKinematics {
        avg_velocity,
        residual_step_length: mean_absolute_deviation(&step_lengths),
        avg_step_time: mean(&step_times),
        residual_step_time: mean_absolute_deviation(&step_times),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_peak_is_degenerate() {
        let mut signal = vec![0.0; 50];
        signal[20] = 5.0;
        assert_eq!(step_kinematics(&signal, 0.02), StepKinematics::default());
        assert_eq!(step_kinematics(&[], 0.02), StepKinematics::default());
    }

    #[test]
    fn test_regular_steps() {
        // Peaks every 10 samples at 50 Hz -> 0.2 s per step
        let signal: Vec<f64> = (0..60).map(|i| if i % 10 == 5 { 4.0 } else { 0.0 }).collect();
        let k = step_kinematics(&signal, 0.02);

        assert!((k.avg_step_time - 0.2).abs() < 1e-12);
        assert!(k.residual_step_time.abs() < 1e-12);
        assert!(k.avg_velocity.is_finite());
        assert!(k.residual_step_length.is_finite());
    }

    #[test]
    fn test_irregular_step_times() {
        let mut signal = vec![0.0; 40];
        for i in [5, 10, 25] {
            signal[i] = 4.0;
        }
        let k = step_kinematics(&signal, 0.1);
        // 10 Hz: intervals 0.5 s and 1.5 s
        assert!((k.avg_step_time - 1.0).abs() < 1e-12);
        assert!((k.residual_step_time - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_of_constant_is_zero() {
        assert!(velocity(&[2.0; 8], 0.02).iter().all(|v| v.abs() < 1e-12));
    }
}
