//! Welch's method: averaged periodograms of overlapping Hann-windowed segments

use super::AverageType;
use crate::stats;
use eeg_core::{FeatureError, FeatureResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::trace;

/// Welch segmentation parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WelchSettings {
    /// Segment length in samples; defaults to one second of data
    pub nperseg: Option<usize>,
    /// Overlap between segments in samples; defaults to `nperseg / 8`
    pub noverlap: Option<usize>,
}

impl WelchSettings {
    /// Resolve segment length and overlap for a signal of `samples` samples.
    ///
    /// Segments longer than the signal are shortened to the signal length.
    pub fn resolve(&self, sampling_frequency: f64, samples: usize) -> FeatureResult<(usize, usize)> {
        let requested = self.nperseg.unwrap_or(sampling_frequency.floor() as usize);
        let nperseg = requested.min(samples).max(1);
        let noverlap = self.noverlap.unwrap_or(nperseg / 8);

        if noverlap >= nperseg {
            return Err(FeatureError::config(format!(
                "Welch overlap {} must be smaller than segment length {}",
                noverlap, nperseg
            )));
        }

        Ok((nperseg, noverlap))
    }
}

/// Periodic Hann window
pub(crate) fn hann_window(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    (0..len)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / len as f64).cos())
        .collect()
}

/// Welch PSD of every row of a `channels × samples` matrix
pub(crate) fn welch_matrix(
    channels: ArrayView2<'_, f64>,
    sampling_frequency: f64,
    avg_type: AverageType,
    settings: &WelchSettings,
) -> FeatureResult<(Array1<f64>, Array2<f64>)> {
    let samples = channels.ncols();
    if samples == 0 {
        return Err(FeatureError::InsufficientSamples { samples, required: 1 });
    }

    let (nperseg, noverlap) = settings.resolve(sampling_frequency, samples)?;
    let step = nperseg - noverlap;
    let n_segments = (samples - nperseg) / step + 1;
    let n_bins = nperseg / 2 + 1;

    trace!(nperseg, noverlap, n_segments, "Welch segmentation");

    let window = hann_window(nperseg);
    let window_power: f64 = window.iter().map(|w| w * w).sum();
    let scale = 1.0 / (sampling_frequency * window_power);

    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(nperseg);
    let mut input = r2c.make_input_vec();
    let mut output = r2c.make_output_vec();

    let frequencies = Array1::from_shape_fn(n_bins, |k| k as f64 * sampling_frequency / nperseg as f64);
    let mut power = Array2::<f64>::zeros((channels.nrows(), n_bins));

    for (channel, row) in channels.rows().into_iter().enumerate() {
        let mut periodograms: Vec<Vec<f64>> = Vec::with_capacity(n_segments);

        for segment_idx in 0..n_segments {
            let start = segment_idx * step;
            let segment = row.slice(ndarray::s![start..start + nperseg]);
            fill_detrended_windowed(&mut input, segment, &window);

            r2c.process(&mut input, &mut output)
                .map_err(|e| FeatureError::FftFailure { reason: e.to_string() })?;

            let periodogram = output
                .iter()
                .enumerate()
                .map(|(k, bin)| {
                    let density = bin.norm_sqr() * scale;
                    if is_one_sided_interior(k, nperseg) { 2.0 * density } else { density }
                })
                .collect();
            periodograms.push(periodogram);
        }

        for k in 0..n_bins {
            let column: Vec<f64> = periodograms.iter().map(|p| p[k]).collect();
            power[[channel, k]] = match avg_type {
                AverageType::Mean => stats::mean(&column),
                AverageType::Median => stats::median(&column),
            };
        }
    }

    Ok((frequencies, power))
}

/// Remove the segment mean and apply the window
fn fill_detrended_windowed(buffer: &mut [f64], segment: ArrayView1<'_, f64>, window: &[f64]) {
    let offset = segment.sum() / segment.len() as f64;
    for ((slot, &x), &w) in buffer.iter_mut().zip(segment.iter()).zip(window) {
        *slot = (x - offset) * w;
    }
}

/// Bins whose power is folded in from the negative frequencies
fn is_one_sided_interior(k: usize, nperseg: usize) -> bool {
    if k == 0 {
        return false;
    }
    !(nperseg % 2 == 0 && k == nperseg / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| (2.0 * PI * freq * i as f64 / fs).sin()).collect()
    }

    #[test]
    fn test_hann_window_is_periodic() {
        let window = hann_window(8);
        assert_eq!(window.len(), 8);
        assert!(window[0].abs() < 1e-12);
        assert!((window[4] - 1.0).abs() < 1e-12);
        assert_eq!(hann_window(1), vec![1.0]);
    }

    #[test]
    fn test_default_segmentation() {
        let settings = WelchSettings::default();
        assert_eq!(settings.resolve(125.0, 600).unwrap(), (125, 15));
        // segment clipped to signal length
        assert_eq!(settings.resolve(125.0, 100).unwrap(), (100, 12));
    }

    #[test]
    fn test_overlap_must_be_shorter_than_segment() {
        let settings = WelchSettings { nperseg: Some(64), noverlap: Some(64) };
        assert!(matches!(
            settings.resolve(125.0, 600),
            Err(FeatureError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_frequency_axis() {
        let signal = Array2::from_shape_vec((1, 600), sine(10.0, 125.0, 600)).unwrap();
        let (freqs, power) =
            welch_matrix(signal.view(), 125.0, AverageType::Mean, &WelchSettings::default()).unwrap();

        assert_eq!(freqs.len(), 63);
        assert_eq!(power.dim(), (1, 63));
        assert_eq!(freqs[0], 0.0);
        assert!(freqs[freqs.len() - 1] <= 62.5);
        assert!(freqs.windows(2).into_iter().all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_peak_at_tone_frequency() {
        let fs = 256.0;
        let signal = Array2::from_shape_vec((1, 1024), sine(16.0, fs, 1024)).unwrap();
        let (freqs, power) =
            welch_matrix(signal.view(), fs, AverageType::Mean, &WelchSettings::default()).unwrap();

        let peak = power
            .row(0)
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!((freqs[peak] - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_density_scaling_matches_variance() {
        // integrated one-sided density approximates the signal variance
        let fs = 256.0;
        let signal = Array2::from_shape_vec((1, 2048), sine(20.0, fs, 2048)).unwrap();
        let (freqs, power) =
            welch_matrix(signal.view(), fs, AverageType::Mean, &WelchSettings::default()).unwrap();

        let df = freqs[1] - freqs[0];
        let total: f64 = power.row(0).sum() * df;
        assert!((total - 0.5).abs() < 0.02, "integrated power {}", total);
    }

    #[test]
    fn test_median_and_mean_agree_on_stationary_tone() {
        let fs = 128.0;
        let signal = Array2::from_shape_vec((1, 1280), sine(8.0, fs, 1280)).unwrap();
        let settings = WelchSettings::default();
        let (_, mean) = welch_matrix(signal.view(), fs, AverageType::Mean, &settings).unwrap();
        let (_, median) = welch_matrix(signal.view(), fs, AverageType::Median, &settings).unwrap();

        let peak_mean = mean[[0, 8]];
        let peak_median = median[[0, 8]];
        assert!((peak_mean - peak_median).abs() / peak_mean < 0.05);
    }

    #[test]
    fn test_empty_signal_rejected() {
        let signal = Array2::<f64>::zeros((2, 0));
        let result = welch_matrix(signal.view(), 125.0, AverageType::Mean, &WelchSettings::default());
        assert_eq!(
            result.unwrap_err(),
            FeatureError::InsufficientSamples { samples: 0, required: 1 }
        );
    }
}
