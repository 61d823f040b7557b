//! Signal statistics and spectral placeholders
//!
//! `frequency_ratio` and `total_harmonic_distortion` are reserved zero-valued
//! outputs, and `band_power` is the plain signal sum. Downstream consumers
//! depend on these exact values; do not replace them with spectral estimates
//! without versioning the output.

use crate::numeric::{mean, std_dev, variance};

/// Sample skewness: mean of cubed standardized deviations
pub fn skewness(signal: &[f64]) -> f64 {
    standardized_moment(signal, 3)
}

/// Excess kurtosis: mean of standardized deviations to the 4th, minus 3
pub fn kurtosis(signal: &[f64]) -> f64 {
    if signal.is_empty() || std_dev(signal) == 0.0 {
        return 0.0;
    }
    standardized_moment(signal, 4) - 3.0
}

fn standardized_moment(signal: &[f64], order: i32) -> f64 {
    let s = std_dev(signal);
    if signal.is_empty() || s == 0.0 {
        return 0.0;
    }
    let m = mean(signal);
    mean(&signal.iter().map(|x| ((x - m) / s).powi(order)).collect::<Vec<_>>())
}

/// `10 * log10(mean^2 / variance)`; 0 when undefined
pub fn signal_noise_ratio(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    let m = mean(signal);
    let snr = 10.0 * (m * m / variance(signal)).log10();
    if snr.is_finite() {
        snr
    } else {
        0.0
    }
}

/// Raw sum of the signal
pub fn band_power(signal: &[f64]) -> f64 {
    signal.iter().sum()
}

/// Always 0
pub fn frequency_ratio(_signal: &[f64]) -> f64 {
    0.0
}

/// Always 0
pub fn total_harmonic_distortion(_signal: &[f64]) -> f64 {
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_symmetric_signal() {
        let signal = [-2.0, -1.0, 0.0, 1.0, 2.0];
        assert!(skewness(&signal).abs() < 1e-12);
        // m4 / m2^2 = 6.8 / 4 = 1.7
        assert!((kurtosis(&signal) - (1.7 - 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_right_skew() {
        assert!(skewness(&[0.0, 0.0, 0.0, 0.0, 10.0]) > 1.0);
    }

    #[test]
    fn test_degenerate_moments() {
        assert_eq!(skewness(&[]), 0.0);
        assert_eq!(kurtosis(&[]), 0.0);
        assert_eq!(skewness(&[3.0; 4]), 0.0);
        assert_eq!(kurtosis(&[3.0; 4]), 0.0);
    }

    #[test]
    fn test_signal_noise_ratio() {
        // mean 2, variance 1 -> 10 * log10(4)
        let snr = signal_noise_ratio(&[1.0, 3.0]);
        assert!((snr - 10.0 * 4f64.log10()).abs() < 1e-12);
        assert_eq!(signal_noise_ratio(&[]), 0.0);
        assert_eq!(signal_noise_ratio(&[5.0, 5.0]), 0.0);
    }

    #[test]
    fn test_placeholders() {
        let signal = [1.0, -2.0, 4.5];
        assert_eq!(band_power(&signal), 3.5);
        assert_eq!(frequency_ratio(&signal), 0.0);
        assert_eq!(total_harmonic_distortion(&signal), 0.0);
    }
}
