//! Seeded multichannel EEG simulator

use crate::signal_patterns::SignalPattern;
use eeg_core::signal::validate_sampling_frequency;
use eeg_core::{config_error, FeatureError, FeatureResult};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Configuration for EEG simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EegConfig {
    /// Sampling frequency in Hz
    pub sampling_frequency: f64,
    pub channel_count: usize,
    /// Samples per channel
    pub samples: usize,
    pub pattern: SignalPattern,
    /// Gaussian noise standard deviation (0.0 = no noise)
    pub noise_std: f64,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl EegConfig {
    /// 16 channels, 600 samples at 125 Hz of the sine/cosine mixture
    pub fn openbci_fixture(seed: u64) -> Self {
        EegConfig {
            sampling_frequency: 125.0,
            channel_count: 16,
            samples: 600,
            pattern: SignalPattern::Mixture,
            noise_std: 0.0,
            seed,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> FeatureResult<()> {
        validate_sampling_frequency(self.sampling_frequency)
            .map_err(|e| FeatureError::config(e.to_string()))?;

        if self.channel_count == 0 {
            return Err(FeatureError::config("Channel count must be positive"));
        }
        if self.samples == 0 {
            return Err(FeatureError::config("Sample count must be positive"));
        }
        if !(self.noise_std.is_finite() && self.noise_std >= 0.0) {
            return Err(config_error!("Noise level must be non-negative, got {}", self.noise_std));
        }

        self.pattern.validate()
    }

    /// Recording length in seconds
    pub fn duration(&self) -> f64 {
        self.samples as f64 / self.sampling_frequency
    }
}

impl Default for EegConfig {
    fn default() -> Self {
        Self::openbci_fixture(45)
    }
}

/// EEG signal simulator
pub struct EegSimulator {
    config: EegConfig,
    rng: StdRng,
    noise: Option<Normal<f64>>,
}

impl EegSimulator {
    /// Create new EEG simulator with configuration
    pub fn new(config: EegConfig) -> FeatureResult<Self> {
        config.validate()?;

        let noise = if config.noise_std > 0.0 {
            let normal = Normal::new(0.0, config.noise_std)
                .map_err(|e| config_error!("Failed to create normal distribution: {}", e))?;
            Some(normal)
        } else {
            None
        };

        Ok(EegSimulator {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            noise,
        })
    }

    /// Get current configuration
    pub fn config(&self) -> &EegConfig {
        &self.config
    }

    /// Generate a `channels × samples` recording.
    ///
    /// Successive calls continue the random stream, so they differ unless
    /// the pattern and noise are both deterministic.
    pub fn generate(&mut self) -> FeatureResult<Array2<f64>> {
        let EegConfig {
            sampling_frequency,
            channel_count,
            samples,
            pattern,
            ..
        } = self.config;

        let mut data = Array2::<f64>::zeros((channel_count, samples));

        for (channel, mut row) in data.rows_mut().into_iter().enumerate() {
            match pattern {
                SignalPattern::Mixture => {
                    let sin_amplitude = self.rng.gen_range(1..=10_u32) as f64;
                    let cos_amplitude = self.rng.gen_range(1..=10_u32) as f64;
                    // linspace(0, samples, samples)
                    let step = if samples > 1 {
                        samples as f64 / (samples - 1) as f64
                    } else {
                        0.0
                    };
                    for (i, value) in row.iter_mut().enumerate() {
                        let t = i as f64 * step;
                        *value = sin_amplitude * t.sin() + cos_amplitude * t.cos();
                    }
                }
                SignalPattern::Rhythm { frequency, amplitude } => {
                    let phase = channel as f64 * PI / 8.0;
                    for (i, value) in row.iter_mut().enumerate() {
                        let t = i as f64 / sampling_frequency;
                        *value = amplitude * (2.0 * PI * frequency * t + phase).sin();
                    }
                }
                SignalPattern::Flat => {}
            }

            if let Some(noise) = &self.noise {
                for value in row.iter_mut() {
                    *value += noise.sample(&mut self.rng);
                }
            }
        }

        debug!(
            channels = channel_count,
            samples,
            pattern = pattern.description(),
            "Generated synthetic EEG"
        );

        Ok(data)
    }
}
