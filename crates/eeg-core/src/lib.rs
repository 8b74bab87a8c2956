//! EEG-Core: Foundation types for EEG feature extraction
//!
//! Error taxonomy, signal views, frequency bands and montage tables shared by
//! the feature engines.

pub mod band;
pub mod error;
pub mod montage;
pub mod signal;

pub use band::{resolve_bands, FrequencyBand, NamedBand};
pub use error::{FeatureError, FeatureResult};
pub use signal::{AsSignal, SignalShape};
