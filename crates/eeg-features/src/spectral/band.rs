//! Band-power aggregation over a power spectral density

use super::{spectrum_of_view, AverageType, SpectralMethod, SpectralSettings, Spectrum};
use eeg_core::{AsSignal, FeatureError, FeatureResult, FrequencyBand, SignalShape};
use ndarray::{arr0, Array1, Array2, ArrayD, Axis};
use tracing::debug;

/// Log power spectral density via Welch's method with mean averaging.
///
/// Returns `(log10(power), frequencies)`; the power keeps the input's
/// dimensionality and its last axis matches the frequency axis.
pub fn compute_psd<S>(signal: &S, sampling_frequency: f64) -> FeatureResult<(ArrayD<f64>, Array1<f64>)>
where
    S: AsSignal + ?Sized,
{
    let signal = signal.as_signal()?;
    let spectrum = spectrum_of_view(
        signal.view(),
        sampling_frequency,
        SpectralMethod::Welch,
        AverageType::Mean,
        &SpectralSettings::default(),
    )?;
    spectrum.validate()?;

    Ok((spectrum.log_power(), spectrum.frequencies))
}

/// Log10 of the mean spectral power inside `band`.
///
/// Single-channel signals yield a 0-dimensional array, multi-channel signals
/// one value per channel.
///
/// With [`SpectralMethod::Medfilt`] the band edges are **not** applied: the
/// whole smoothed spectrum is averaged. This mirrors the reference behaviour
/// and is kept deliberately until its intent is settled.
pub fn band_power<S>(
    signal: &S,
    sampling_frequency: f64,
    band: FrequencyBand,
    method: SpectralMethod,
    avg_type: AverageType,
) -> FeatureResult<ArrayD<f64>>
where
    S: AsSignal + ?Sized,
{
    band_power_with(signal, sampling_frequency, band, method, avg_type, &SpectralSettings::default())
}

/// [`band_power`] with explicit estimator settings
pub fn band_power_with<S>(
    signal: &S,
    sampling_frequency: f64,
    band: FrequencyBand,
    method: SpectralMethod,
    avg_type: AverageType,
    settings: &SpectralSettings,
) -> FeatureResult<ArrayD<f64>>
where
    S: AsSignal + ?Sized,
{
    let signal = signal.as_signal()?;
    SignalShape::of(&signal.view())?;
    band.validate()?;

    let spectrum = spectrum_of_view(signal.view(), sampling_frequency, method, avg_type, settings)?;
    spectrum.validate()?;

    let per_channel = aggregate_band(&spectrum, sampling_frequency, band, method)?;
    if spectrum.is_multichannel() {
        Ok(per_channel.into_dyn())
    } else {
        Ok(arr0(per_channel[0]).into_dyn())
    }
}

/// Log band power for every band in `bands`, in order.
///
/// Output shape is `(n_bands,)` for single-channel signals and
/// `(n_channels, n_bands)` for multi-channel signals. Each column equals
/// [`band_power`] for that band.
pub fn bands_power<S>(
    signal: &S,
    sampling_frequency: f64,
    bands: &[FrequencyBand],
    method: SpectralMethod,
    avg_type: AverageType,
) -> FeatureResult<ArrayD<f64>>
where
    S: AsSignal + ?Sized,
{
    bands_power_with(signal, sampling_frequency, bands, method, avg_type, &SpectralSettings::default())
}

/// [`bands_power`] with explicit estimator settings
pub fn bands_power_with<S>(
    signal: &S,
    sampling_frequency: f64,
    bands: &[FrequencyBand],
    method: SpectralMethod,
    avg_type: AverageType,
    settings: &SpectralSettings,
) -> FeatureResult<ArrayD<f64>>
where
    S: AsSignal + ?Sized,
{
    let signal = signal.as_signal()?;
    let shape = SignalShape::of(&signal.view())?;
    for band in bands {
        band.validate()?;
    }

    // the spectrum does not depend on the band, so estimate it once
    let spectrum = spectrum_of_view(signal.view(), sampling_frequency, method, avg_type, settings)?;
    spectrum.validate()?;

    let mut table = Array2::<f64>::zeros((shape.channel_count(), bands.len()));
    for (band_idx, band) in bands.iter().enumerate() {
        let column = aggregate_band(&spectrum, sampling_frequency, *band, method)?;
        table.column_mut(band_idx).assign(&column);
    }

    if shape.is_multichannel() {
        Ok(table.into_dyn())
    } else {
        Ok(table.index_axis_move(Axis(0), 0).into_dyn())
    }
}

/// Per-channel log10 mean power of a validated spectrum
fn aggregate_band(
    spectrum: &Spectrum,
    sampling_frequency: f64,
    band: FrequencyBand,
    method: SpectralMethod,
) -> FeatureResult<Array1<f64>> {
    let power = spectrum.power_matrix()?;

    let linear: Array1<f64> = match method {
        SpectralMethod::Welch => {
            let nyquist = sampling_frequency / 2.0;
            if let Some(&last) = spectrum.frequencies.iter().next_back() {
                if last > nyquist {
                    return Err(FeatureError::NyquistExceeded { last, nyquist });
                }
            }

            let selected: Vec<usize> = spectrum
                .frequencies
                .iter()
                .enumerate()
                .filter(|(_, f)| band.contains(**f))
                .map(|(k, _)| k)
                .collect();
            if selected.is_empty() {
                return Err(FeatureError::EmptyBandSelection {
                    low: band.low,
                    high: band.high,
                });
            }

            debug!(%band, bins = selected.len(), "Selected frequency bins");

            power
                .rows()
                .into_iter()
                .map(|row| selected.iter().map(|&k| row[k]).sum::<f64>() / selected.len() as f64)
                .collect()
        }
        SpectralMethod::Medfilt => power
            .rows()
            .into_iter()
            .map(|row| row.sum() / row.len() as f64)
            .collect(),
    };

    Ok(linear.mapv(f64::log10))
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use ndarray::Array2;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn bands_power_columns_match_band_power(
            channels in 1usize..4,
            low in 1.0f64..30.0,
            width in 2.0f64..20.0,
            phase in 0.0f64..3.0,
        ) {
            let signal = Array2::from_shape_fn((channels, 500), |(c, i)| {
                ((c + 1) as f64 * 0.17 * i as f64 + phase).sin() + 0.1 * (0.05 * i as f64).cos()
            });
            let band = FrequencyBand::new(low, low + width).unwrap();

            let table = bands_power(&signal, 125.0, &[band], SpectralMethod::Welch, AverageType::Mean).unwrap();
            let single = band_power(&signal, 125.0, band, SpectralMethod::Welch, AverageType::Mean).unwrap();

            prop_assert_eq!(table.shape(), &[channels, 1]);
            for c in 0..channels {
                prop_assert_eq!(table[[c, 0]], single[[c]]);
            }
        }

        #[test]
        fn compute_psd_keeps_input_dimensionality(samples in 2usize..400, multichannel in any::<bool>()) {
            let fs = 100.0;
            let (log_power, freqs) = if multichannel {
                let signal = Array2::from_shape_fn((2, samples), |(c, i)| ((c + 1) as f64 * i as f64).sin());
                compute_psd(&signal, fs).unwrap()
            } else {
                let signal: Vec<f64> = (0..samples).map(|i| (i as f64 * 0.3).cos()).collect();
                compute_psd(&signal, fs).unwrap()
            };

            prop_assert_eq!(log_power.ndim(), if multichannel { 2 } else { 1 });
            prop_assert_eq!(log_power.shape()[log_power.ndim() - 1], freqs.len());
            prop_assert!(freqs.iter().all(|&f| f <= fs / 2.0));
        }
    }
}
