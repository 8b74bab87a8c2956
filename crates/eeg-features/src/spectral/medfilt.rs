//! Median-filtered periodogram

use crate::stats;
use eeg_core::{FeatureError, FeatureResult};
use ndarray::{Array1, Array2, ArrayView2};
use num_complex::Complex;
use rustfft::FftPlanner;
use tracing::trace;

/// Kernel length in bins for a filter `filter_hz` wide, forced odd and
/// capped at the longest odd length that fits in `n_bins`
pub(crate) fn kernel_length(filter_hz: f64, resolution: f64, n_bins: usize) -> usize {
    let n_bins = n_bins.max(1);
    let cap = if n_bins % 2 == 0 { n_bins - 1 } else { n_bins };

    let bins = (filter_hz / resolution).floor().clamp(0.0, n_bins as f64) as usize;
    let odd = if bins % 2 == 0 { bins + 1 } else { bins };
    odd.min(cap)
}

/// Smoothed periodogram of every row of a `channels × samples` matrix.
///
/// Only the first `ceil(n / 2)` bins of the full FFT are kept.
pub(crate) fn medfilt_matrix(
    channels: ArrayView2<'_, f64>,
    sampling_frequency: f64,
    filter_hz: f64,
) -> FeatureResult<(Array1<f64>, Array2<f64>)> {
    let samples = channels.ncols();
    if samples < 2 {
        return Err(FeatureError::InsufficientSamples { samples, required: 2 });
    }
    if !(filter_hz.is_finite() && filter_hz > 0.0) {
        return Err(FeatureError::config(format!(
            "Median filter length must be positive, got {} Hz",
            filter_hz
        )));
    }

    let n_bins = (samples + 1) / 2;
    let resolution = 1.0 / (samples as f64 * (1.0 / sampling_frequency));
    let kernel = kernel_length(filter_hz, resolution, n_bins);
    let scale = 1.0 / (sampling_frequency * samples as f64);

    trace!(n_bins, kernel, "Median-filtered periodogram");

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(samples);

    let frequencies = Array1::from_shape_fn(n_bins, |k| k as f64 * resolution);
    let mut power = Array2::<f64>::zeros((channels.nrows(), n_bins));

    for (channel, row) in channels.rows().into_iter().enumerate() {
        let mut buffer: Vec<Complex<f64>> = row.iter().map(|&x| Complex::new(x, 0.0)).collect();
        fft.process(&mut buffer);

        let periodogram: Vec<f64> = buffer[..n_bins].iter().map(|c| c.norm_sqr() * scale).collect();
        let smoothed = stats::median_filter(&periodogram, kernel);

        for (slot, value) in power.row_mut(channel).iter_mut().zip(smoothed) {
            *slot = value;
        }
    }

    Ok((frequencies, power))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_kernel_length_is_odd() {
        // 600 samples at 125 Hz: 0.2083 Hz bins, 1 Hz spans 4.8 bins
        assert_eq!(kernel_length(1.0, 125.0 / 600.0, 300), 5);
        assert_eq!(kernel_length(1.0, 0.5, 300), 3);
        assert_eq!(kernel_length(1.0, 1.0, 300), 1);
        assert_eq!(kernel_length(0.1, 1.0, 300), 1);
    }

    #[test]
    fn test_kernel_length_capped_by_bins() {
        assert_eq!(kernel_length(1e12, 125.0 / 600.0, 300), 299);
        assert_eq!(kernel_length(f64::MAX, 1.0, 7), 7);
        assert_eq!(kernel_length(4.0, 1.0, 4), 3);
        assert_eq!(kernel_length(1e9, 1.0, 1), 1);
    }

    #[test]
    fn test_huge_filter_width_still_runs() {
        let signal = Array2::from_shape_fn((1, 600), |(_, i)| (i as f64 * 0.1).sin());
        let (freqs, power) = medfilt_matrix(signal.view(), 125.0, 1e12).unwrap();

        assert_eq!(power.dim(), (1, freqs.len()));
        assert!(power.iter().all(|p| p.is_finite() && *p >= 0.0));
    }

    #[test]
    fn test_positive_half_only() {
        let signal = Array2::from_shape_fn((2, 600), |(c, i)| ((c + 1) as f64 * i as f64 * 0.1).sin());
        let (freqs, power) = medfilt_matrix(signal.view(), 125.0, 1.0).unwrap();

        assert_eq!(freqs.len(), 300);
        assert_eq!(power.dim(), (2, 300));
        assert!(freqs[freqs.len() - 1] < 62.5);
    }

    #[test]
    fn test_odd_length_bin_count() {
        let signal = Array2::from_shape_fn((1, 7), |(_, i)| i as f64);
        let (freqs, _) = medfilt_matrix(signal.view(), 7.0, 1.0).unwrap();
        assert_eq!(freqs.len(), 4);
        assert!((freqs[3] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_smoothing_preserves_broad_peak() {
        let fs = 100.0;
        let signal = Array2::from_shape_fn((1, 1000), |(_, i)| (2.0 * PI * 10.0 * i as f64 / fs).sin());
        let (freqs, power) = medfilt_matrix(signal.view(), fs, 1.0).unwrap();

        // 0.1 Hz bins: a 1 Hz kernel flattens a single-bin tone
        let tone_bin = freqs.iter().position(|&f| (f - 10.0).abs() < 1e-9).unwrap();
        assert!(power[[0, tone_bin]] < 1e-6);
        assert!(power.iter().all(|p| p.is_finite() && *p >= 0.0));
    }

    #[test]
    fn test_too_short_signal() {
        let signal = Array2::<f64>::zeros((1, 1));
        assert_eq!(
            medfilt_matrix(signal.view(), 125.0, 1.0).unwrap_err(),
            FeatureError::InsufficientSamples { samples: 1, required: 2 }
        );
    }
}
