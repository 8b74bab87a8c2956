//! Spectral estimation and band-power aggregation
//!
//! Two estimators are available: Welch's segment-averaged periodogram and a
//! median-filtered full-length periodogram. Both return a [`Spectrum`] whose
//! power keeps the dimensionality of the input signal.

mod band;
mod medfilt;
mod welch;

pub use band::{band_power, band_power_with, bands_power, bands_power_with, compute_psd};
pub use welch::WelchSettings;

use eeg_core::signal::{channel_matrix, validate_sampling_frequency};
use eeg_core::{AsSignal, FeatureError, FeatureResult, SignalShape};
use ndarray::{Array1, Array2, ArrayD, ArrayView2, ArrayViewD, Axis, Ix2};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Spectral-estimation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpectralMethod {
    /// Welch's method: averaged periodograms of overlapping windowed segments
    #[default]
    Welch,
    /// Median-filtered periodogram of the whole signal
    Medfilt,
}

impl SpectralMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpectralMethod::Welch => "welch",
            SpectralMethod::Medfilt => "medfilt",
        }
    }
}

impl FromStr for SpectralMethod {
    type Err = FeatureError;

    fn from_str(s: &str) -> FeatureResult<Self> {
        match s {
            "welch" => Ok(SpectralMethod::Welch),
            "medfilt" => Ok(SpectralMethod::Medfilt),
            other => Err(FeatureError::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SpectralMethod {
    type Error = FeatureError;

    fn try_from(value: String) -> FeatureResult<Self> {
        value.parse()
    }
}

impl From<SpectralMethod> for String {
    fn from(method: SpectralMethod) -> Self {
        method.as_str().to_string()
    }
}

impl std::fmt::Display for SpectralMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How Welch segments are combined into one spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AverageType {
    #[default]
    Mean,
    Median,
}

impl AverageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AverageType::Mean => "mean",
            AverageType::Median => "median",
        }
    }
}

impl FromStr for AverageType {
    type Err = FeatureError;

    fn from_str(s: &str) -> FeatureResult<Self> {
        match s {
            "mean" => Ok(AverageType::Mean),
            "median" => Ok(AverageType::Median),
            other => Err(FeatureError::UnsupportedAverage {
                avg_type: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for AverageType {
    type Error = FeatureError;

    fn try_from(value: String) -> FeatureResult<Self> {
        value.parse()
    }
}

impl From<AverageType> for String {
    fn from(avg_type: AverageType) -> Self {
        avg_type.as_str().to_string()
    }
}

impl std::fmt::Display for AverageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunable estimator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralSettings {
    /// Welch segmentation
    pub welch: WelchSettings,
    /// Median filter length in Hz for the medfilt estimator
    pub medfilt_filter_hz: f64,
}

impl Default for SpectralSettings {
    fn default() -> Self {
        Self {
            welch: WelchSettings::default(),
            medfilt_filter_hz: 1.0,
        }
    }
}

/// Power spectral density of a 1-D or 2-D signal
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Bin centre frequencies in Hz, ascending
    pub frequencies: Array1<f64>,
    /// `(n_frequencies,)` or `(n_channels, n_frequencies)` linear power
    pub power: ArrayD<f64>,
}

impl Spectrum {
    fn from_rows(frequencies: Array1<f64>, rows: Array2<f64>, shape: SignalShape) -> Self {
        let power = if shape.is_multichannel() {
            rows.into_dyn()
        } else {
            rows.index_axis_move(Axis(0), 0).into_dyn()
        };
        Spectrum { frequencies, power }
    }

    pub fn n_frequencies(&self) -> usize {
        self.frequencies.len()
    }

    pub fn ndim(&self) -> usize {
        self.power.ndim()
    }

    pub fn is_multichannel(&self) -> bool {
        self.power.ndim() == 2
    }

    /// Power as `channels × frequencies`, promoting single-channel spectra
    pub fn power_matrix(&self) -> FeatureResult<ArrayView2<'_, f64>> {
        let view = match self.power.ndim() {
            1 => self.power.view().insert_axis(Axis(0)),
            _ => self.power.view(),
        };
        let ndim = self.power.ndim();
        view.into_dimensionality::<Ix2>()
            .map_err(|_| FeatureError::InvalidSignalShape { ndim, expected: "1 or 2" })
    }

    /// Check the invariants every derived computation relies on
    pub fn validate(&self) -> FeatureResult<()> {
        let ndim = self.power.ndim();
        if ndim == 0 || ndim > 2 {
            return Err(FeatureError::InvalidSignalShape { ndim, expected: "1 or 2" });
        }

        let bins = self.power.shape()[ndim - 1];
        if bins != self.frequencies.len() {
            return Err(FeatureError::SpectrumShapeMismatch {
                frequencies: self.frequencies.len(),
                bins,
            });
        }

        if self.power.iter().any(|p| p.is_nan()) {
            return Err(FeatureError::NonFiniteSpectrum);
        }

        Ok(())
    }

    /// Element-wise `log10` of the power
    pub fn log_power(&self) -> ArrayD<f64> {
        self.power.mapv(f64::log10)
    }
}

/// Estimate the power spectral density of a 1-D or 2-D signal.
///
/// `avg_type` only affects Welch; the medfilt estimator has no segments to
/// average and ignores it.
pub fn compute_spectrum<S>(
    signal: &S,
    sampling_frequency: f64,
    method: SpectralMethod,
    avg_type: AverageType,
    settings: &SpectralSettings,
) -> FeatureResult<Spectrum>
where
    S: AsSignal + ?Sized,
{
    let signal = signal.as_signal()?;
    spectrum_of_view(signal.view(), sampling_frequency, method, avg_type, settings)
}

pub(crate) fn spectrum_of_view(
    signal: ArrayViewD<'_, f64>,
    sampling_frequency: f64,
    method: SpectralMethod,
    avg_type: AverageType,
    settings: &SpectralSettings,
) -> FeatureResult<Spectrum> {
    let shape = SignalShape::of(&signal)?;
    validate_sampling_frequency(sampling_frequency)?;
    let channels = channel_matrix(signal)?;

    let (frequencies, rows) = match method {
        SpectralMethod::Welch => {
            welch::welch_matrix(channels, sampling_frequency, avg_type, &settings.welch)?
        }
        SpectralMethod::Medfilt => {
            medfilt::medfilt_matrix(channels, sampling_frequency, settings.medfilt_filter_hz)?
        }
    };

    debug!(
        method = method.as_str(),
        avg_type = avg_type.as_str(),
        channels = shape.channel_count(),
        frequencies = frequencies.len(),
        "Computed spectrum"
    );

    Ok(Spectrum::from_rows(frequencies, rows, shape))
}
