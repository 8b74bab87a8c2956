//! EEG-Features: band-power and Hjorth feature engines
//!
//! Both engines are stateless functions over 1-D or 2-D signals. The
//! [`FeatureExtractor`] runs them together from a [`FeatureConfig`].

pub mod config;
pub mod extractor;
pub mod hjorth;
pub mod pipeline;
pub mod spectral;
pub mod stats;

pub use config::FeatureConfig;
pub use extractor::{FeatureExtractor, FeatureSet};
pub use hjorth::{hjorth_parameters, hjorth_table, HjorthParameters, HjorthTable};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineOutput, StepMetrics};
pub use spectral::{
    band_power, band_power_with, bands_power, bands_power_with, compute_psd, compute_spectrum,
    AverageType, SpectralMethod, SpectralSettings, Spectrum, WelchSettings,
};
