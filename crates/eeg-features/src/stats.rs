//! Descriptive statistics shared by the feature engines
//!
//! Population moments (divide by N) throughout.

/// Arithmetic mean; NaN for an empty slice
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population variance; NaN for an empty slice
pub fn variance(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let mu = mean(data);
    data.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / data.len() as f64
}

/// Population standard deviation
pub fn std_dev(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Median, averaging the two central values for even lengths.
///
/// NaN if the slice is empty or holds any NaN.
pub fn median(data: &[f64]) -> f64 {
    if data.is_empty() || data.iter().any(|x| x.is_nan()) {
        return f64::NAN;
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// First difference: `out[i] = data[i + 1] - data[i]`
pub fn diff(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Sliding median with an odd kernel, zero-padded at both edges
pub fn median_filter(data: &[f64], kernel_size: usize) -> Vec<f64> {
    let half = kernel_size / 2;
    let mut window = vec![0.0; kernel_size];

    (0..data.len())
        .map(|center| {
            for (k, slot) in window.iter_mut().enumerate() {
                *slot = (center + k)
                    .checked_sub(half)
                    .and_then(|idx| data.get(idx))
                    .copied()
                    .unwrap_or(0.0);
            }
            median(&window)
        })
        .collect()
}
