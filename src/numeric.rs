//! Shared numeric helpers
//!
//! Population moments, nearest-rank quantiles, covariance, trapezoidal
//! integration and threshold peak detection. Every helper is total: empty
//! input yields 0 (or an empty series) rather than NaN.

/// Arithmetic mean, 0 for an empty series
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by n)
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Nearest-rank quantile: `sorted[round((n - 1) * q)]`
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let index = ((sorted.len() - 1) as f64 * q.clamp(0.0, 1.0)).round() as usize;
    sorted[index.min(sorted.len() - 1)]
}

/// Sample covariance matrix `[[var_a, cov], [cov, var_b]]` (divides by n - 1).
///
/// Returns `None` for fewer than two paired samples.
pub fn covariance_2x2(a: &[f64], b: &[f64]) -> Option<[[f64; 2]; 2]> {
    let n = a.len().min(b.len());
    if n < 2 {
        return None;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let (ma, mb) = (mean(a), mean(b));
    let mut saa = 0.0;
    let mut sbb = 0.0;
    let mut sab = 0.0;
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - ma, y - mb);
        saa += dx * dx;
        sbb += dy * dy;
        sab += dx * dy;
    }
    let denom = (n - 1) as f64;
    Some([[saa / denom, sab / denom], [sab / denom, sbb / denom]])
}

/// Trapezoidal integral of a uniformly sampled series
pub fn trapezoid(values: &[f64], dt: f64) -> f64 {
    values.windows(2).map(|w| (w[0] + w[1]) * 0.5 * dt).sum()
}

/// Cumulative trapezoidal integral, starting at 0.
///
/// The output has the same length as the input.
pub fn cumulative_trapezoid(values: &[f64], dt: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut acc = 0.0;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            acc += (values[i - 1] + value) * 0.5 * dt;
        }
        out.push(acc);
    }
    out
}

/// Peak threshold used throughout the feature engine: `mean + std`
pub fn peak_threshold(values: &[f64]) -> f64 {
    mean(values) + std_dev(values)
}

/// Indices of interior samples above `threshold` that strictly exceed
/// both neighbours
pub fn find_peaks(values: &[f64], threshold: f64) -> Vec<usize> {
    if values.len() < 3 {
        return Vec::new();
    }
    (1..values.len() - 1)
        .filter(|&i| {
            let v = values[i];
            v > threshold && v > values[i - 1] && v > values[i + 1]
        })
        .collect()
}

/// Mean absolute deviation around the mean
pub fn mean_absolute_deviation(values: &[f64]) -> f64 {
    let m = mean(values);
    mean(&values.iter().map(|v| (v - m).abs()).collect::<Vec<_>>())
}
