//! Configuration for batch feature extraction

use crate::hjorth::{DEFAULT_SEGMENT_SIZE, MIN_SEGMENT_SIZE};
use crate::spectral::{AverageType, SpectralMethod, SpectralSettings, WelchSettings};
use eeg_core::montage::openbci_channel_names;
use eeg_core::signal::validate_sampling_frequency;
use eeg_core::{config_error, resolve_bands, FeatureError, FeatureResult, FrequencyBand, NamedBand};
use serde::{Deserialize, Serialize};

/// Everything [`crate::FeatureExtractor`] needs to turn a recording into features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Configuration name/profile
    pub name: String,
    /// Sampling frequency in Hz
    pub sampling_frequency: f64,
    /// Bands reported by band power, in output column order
    pub bands: Vec<NamedBand>,
    #[serde(default)]
    pub method: SpectralMethod,
    #[serde(default)]
    pub avg_type: AverageType,
    #[serde(default)]
    pub welch: WelchSettings,
    /// Median filter length in Hz (medfilt only)
    #[serde(default = "default_filter_hz")]
    pub medfilt_filter_hz: f64,
    #[serde(default = "default_segment_size")]
    pub hjorth_segment_size: usize,
    /// Row labels for multi-channel reports
    #[serde(default)]
    pub channel_names: Option<Vec<String>>,
}

fn default_filter_hz() -> f64 {
    SpectralSettings::default().medfilt_filter_hz
}

fn default_segment_size() -> usize {
    DEFAULT_SEGMENT_SIZE
}

impl FeatureConfig {
    /// OpenBCI 16-channel headset at 125 Hz with 4 Hz bands up to 20 Hz
    pub fn openbci_default() -> Self {
        FeatureConfig {
            name: "OpenBCI 16ch".to_string(),
            sampling_frequency: 125.0,
            bands: NamedBand::low_frequency_bands(),
            method: SpectralMethod::Welch,
            avg_type: AverageType::Mean,
            welch: WelchSettings::default(),
            medfilt_filter_hz: default_filter_hz(),
            hjorth_segment_size: DEFAULT_SEGMENT_SIZE,
            channel_names: Some(openbci_channel_names()),
        }
    }

    /// Delta to gamma rhythms at an arbitrary sampling frequency, unlabelled
    pub fn clinical_bands(sampling_frequency: f64) -> Self {
        FeatureConfig {
            name: "Clinical rhythms".to_string(),
            sampling_frequency,
            bands: NamedBand::clinical_bands(),
            channel_names: None,
            ..Self::openbci_default()
        }
    }

    /// Estimator settings derived from this configuration
    pub fn spectral_settings(&self) -> SpectralSettings {
        SpectralSettings {
            welch: self.welch.clone(),
            medfilt_filter_hz: self.medfilt_filter_hz,
        }
    }

    /// Validated band intervals in configuration order
    pub fn frequency_bands(&self) -> FeatureResult<Vec<FrequencyBand>> {
        resolve_bands(&self.bands)
    }

    pub fn band_names(&self) -> Vec<String> {
        self.bands.iter().map(|band| band.name.clone()).collect()
    }

    /// Validate configuration
    pub fn validate(&self) -> FeatureResult<()> {
        if self.name.is_empty() {
            return Err(FeatureError::config("Configuration name cannot be empty"));
        }

        validate_sampling_frequency(self.sampling_frequency)
            .map_err(|e| FeatureError::config(e.to_string()))?;

        for band in &self.bands {
            band.band()
                .map_err(|e| config_error!("Band '{}': {}", band.name, e))?;
        }

        if self.hjorth_segment_size < MIN_SEGMENT_SIZE {
            return Err(config_error!(
                "Hjorth segment size must be at least {}, got {}",
                MIN_SEGMENT_SIZE,
                self.hjorth_segment_size
            ));
        }

        if let (Some(nperseg), Some(noverlap)) = (self.welch.nperseg, self.welch.noverlap) {
            if noverlap >= nperseg {
                return Err(config_error!(
                    "Welch overlap {} must be smaller than segment length {}",
                    noverlap,
                    nperseg
                ));
            }
        }
        if self.welch.nperseg == Some(0) {
            return Err(FeatureError::config("Welch segment length must be positive"));
        }

        if !(self.medfilt_filter_hz.is_finite() && self.medfilt_filter_hz > 0.0) {
            return Err(config_error!(
                "Median filter length must be positive, got {} Hz",
                self.medfilt_filter_hz
            ));
        }

        if let Some(names) = &self.channel_names {
            if names.iter().any(String::is_empty) {
                return Err(FeatureError::config("Channel names cannot be empty"));
            }
        }

        Ok(())
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> FeatureResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| config_error!("Failed to serialize config: {}", e))
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> FeatureResult<Self> {
        serde_json::from_str(json).map_err(|e| config_error!("Failed to parse config: {}", e))
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::openbci_default()
    }
}
