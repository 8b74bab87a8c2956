//! Report service: configuration and signal loading around the extractor

use anyhow::{Context, Result};
use eeg_core::montage::OPENBCI_16_CHANNELS;
use eeg_core::signal::matrix_from_rows;
use eeg_features::{FeatureConfig, FeatureExtractor, FeatureSet};
use eeg_simulation::{EegConfig, EegSimulator};
use ndarray::{Array1, ArrayD};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Seconds of synthetic data generated when no recording is supplied
const SIMULATED_SECONDS: f64 = 5.0;
const SIMULATION_SEED: u64 = 45;

/// Recording on disk: one channel, or nested channel rows
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignalFile {
    Single(Vec<f64>),
    Multi(Vec<Vec<f64>>),
}

/// Load a feature configuration, falling back to the OpenBCI preset
pub fn load_config(path: Option<&Path>) -> Result<FeatureConfig> {
    let Some(path) = path else {
        info!("No configuration given, using OpenBCI defaults");
        return Ok(FeatureConfig::openbci_default());
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = FeatureConfig::from_json(&json)
        .with_context(|| format!("Invalid config {}", path.display()))?;

    info!(name = %config.name, path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Parse a JSON recording
pub fn parse_signal(json: &str) -> Result<ArrayD<f64>> {
    let file: SignalFile = serde_json::from_str(json).context("Signal must be a number array or nested rows")?;

    let signal = match file {
        SignalFile::Single(samples) => Array1::from(samples).into_dyn(),
        SignalFile::Multi(rows) => matrix_from_rows(&rows)?.into_dyn(),
    };
    Ok(signal)
}

/// Load a JSON recording from disk
pub fn load_signal(path: &Path) -> Result<ArrayD<f64>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read signal {}", path.display()))?;
    let signal = parse_signal(&json).with_context(|| format!("Invalid signal {}", path.display()))?;

    info!(shape = ?signal.shape(), path = %path.display(), "Loaded signal");
    Ok(signal)
}

/// Synthetic recording matching the configuration's channel layout
pub fn simulate_signal(config: &FeatureConfig) -> Result<ArrayD<f64>> {
    let channel_count = config
        .channel_names
        .as_ref()
        .map_or(OPENBCI_16_CHANNELS.len(), Vec::len);

    let sim_config = EegConfig {
        sampling_frequency: config.sampling_frequency,
        channel_count,
        samples: (config.sampling_frequency * SIMULATED_SECONDS).round() as usize,
        seed: SIMULATION_SEED,
        ..EegConfig::default()
    };

    info!(
        channels = sim_config.channel_count,
        samples = sim_config.samples,
        "Simulating recording"
    );

    let signal = EegSimulator::new(sim_config)?.generate()?;
    Ok(signal.into_dyn())
}

/// Load or simulate a recording and extract its features
pub fn run(config_path: Option<&Path>, signal_path: Option<&Path>) -> Result<FeatureSet> {
    let config = load_config(config_path)?;
    let extractor = FeatureExtractor::new(config).context("Configuration rejected")?;

    let signal = match signal_path {
        Some(path) => load_signal(path)?,
        None => simulate_signal(extractor.config())?,
    };

    let features = extractor.extract(&signal).context("Feature extraction failed")?;
    Ok(features)
}
