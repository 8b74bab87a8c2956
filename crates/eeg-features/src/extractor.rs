//! Batch feature extraction driven by a [`FeatureConfig`]

use crate::config::FeatureConfig;
use crate::hjorth::{hjorth_table, HjorthTable};
use crate::pipeline::Pipeline;
use crate::spectral::{bands_power_with, compute_psd};
use eeg_core::signal::channel_matrix;
use eeg_core::{config_error, AsSignal, FeatureResult, FrequencyBand, SignalShape};
use ndarray::{Array2, ArrayD, Axis, CowArray};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Container for extracted features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Name of the configuration that produced this set
    pub config_name: String,
    pub sampling_frequency: f64,
    pub channel_count: usize,
    /// Band labels, one per `band_power` column
    pub band_names: Vec<String>,
    /// `log10` band power, channels × bands
    #[serde(with = "log_table")]
    pub band_power: Vec<Vec<f64>>,
    pub hjorth: HjorthTable,
    /// Welch frequency axis of `log_psd`
    pub frequencies: Vec<f64>,
    /// `log10` Welch PSD, channels × frequencies
    #[serde(with = "log_table")]
    pub log_psd: Vec<Vec<f64>>,
}

/// `log10` tables as JSON: a silent bin's `-inf` is written as `null` and
/// read back as `-inf`
mod log_table {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(table: &[Vec<f64>], serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<Vec<Option<f64>>> = table
            .iter()
            .map(|row| row.iter().map(|v| v.is_finite().then_some(*v)).collect())
            .collect();
        rows.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<f64>>, D::Error> {
        let rows = Vec::<Vec<Option<f64>>>::deserialize(deserializer)?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NEG_INFINITY)).collect())
            .collect())
    }
}

impl FeatureSet {
    /// Band power of one channel by band label
    pub fn band_power_of(&self, channel: usize, band_name: &str) -> Option<f64> {
        let column = self.band_names.iter().position(|name| name == band_name)?;
        self.band_power.get(channel)?.get(column).copied()
    }

    /// Export features to JSON
    pub fn to_json(&self) -> FeatureResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| config_error!("Failed to serialize features: {}", e))
    }

    /// Load features previously written by [`FeatureSet::to_json`]
    pub fn from_json(json: &str) -> FeatureResult<Self> {
        serde_json::from_str(json).map_err(|e| config_error!("Failed to parse features: {}", e))
    }
}

/// Computes band power, Hjorth parameters and the log PSD in one pass
#[derive(Debug)]
pub struct FeatureExtractor {
    config: FeatureConfig,
    bands: Vec<FrequencyBand>,
    preprocessing: Option<Pipeline<Array2<f64>>>,
}

impl FeatureExtractor {
    /// Create an extractor from a validated configuration
    pub fn new(config: FeatureConfig) -> FeatureResult<Self> {
        config.validate()?;
        let bands = config.frequency_bands()?;

        Ok(FeatureExtractor {
            config,
            bands,
            preprocessing: None,
        })
    }

    /// Run `pipeline` on the `channels × samples` matrix before extraction
    pub fn with_preprocessing(mut self, pipeline: Pipeline<Array2<f64>>) -> Self {
        self.preprocessing = Some(pipeline);
        self
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Extract every configured feature from a 1-D or 2-D signal.
    ///
    /// Single-channel signals are treated as a one-row matrix, so every table
    /// in the result has one row per channel. Channels are counted after
    /// preprocessing. Configured channel names label the Hjorth rows of
    /// multi-channel signals and must match that count.
    pub fn extract<S>(&self, signal: &S) -> FeatureResult<FeatureSet>
    where
        S: AsSignal + ?Sized,
    {
        let signal = signal.as_signal()?;
        let shape = SignalShape::of(&signal.view())?;
        let matrix = channel_matrix(signal.view())?;

        let channels: CowArray<'_, f64, ndarray::Ix2> = match &self.preprocessing {
            Some(pipeline) => {
                let result = pipeline.forward(&matrix.to_owned())?;
                info!(
                    pipeline = pipeline.name(),
                    total_latency_us = result.total_latency_us,
                    "Preprocessing complete"
                );
                CowArray::from(result.output)
            }
            None => CowArray::from(matrix),
        };

        let fs = self.config.sampling_frequency;
        let band_power = bands_power_with(
            &channels,
            fs,
            &self.bands,
            self.config.method,
            self.config.avg_type,
            &self.config.spectral_settings(),
        )?;

        let channel_count = channels.nrows();
        let labels = if shape.is_multichannel() || channel_count > 1 {
            self.config.channel_names.as_deref()
        } else {
            None
        };
        let hjorth = hjorth_table(&channels, self.config.hjorth_segment_size, labels)?;

        let (log_psd, frequencies) = compute_psd(&channels, fs)?;

        info!(
            config = %self.config.name,
            channels = channel_count,
            bands = self.bands.len(),
            "Extracted features"
        );

        Ok(FeatureSet {
            config_name: self.config.name.clone(),
            sampling_frequency: fs,
            channel_count,
            band_names: self.config.band_names(),
            band_power: rows_of(&band_power),
            hjorth,
            frequencies: frequencies.to_vec(),
            log_psd: rows_of(&log_psd),
        })
    }
}

/// Nested rows of a 2-D array
fn rows_of(table: &ArrayD<f64>) -> Vec<Vec<f64>> {
    table.axis_iter(Axis(0)).map(|row| row.iter().copied().collect()).collect()
}
