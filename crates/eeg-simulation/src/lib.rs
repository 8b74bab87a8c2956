//! EEG-Simulation: synthetic multichannel EEG generation
//!
//! Seeded, reproducible signals for exercising the feature engines.

pub mod eeg_simulator;
pub mod signal_patterns;

pub use eeg_simulator::*;
pub use signal_patterns::*;
