//! Error handling for the EEG feature engines
//!
//! Every failure is raised synchronously at the point of violation and
//! carried back to the caller unchanged.

use thiserror::Error;

/// Result type alias for feature computations
pub type FeatureResult<T> = Result<T, FeatureError>;

/// Error type for all feature-engine operations
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum FeatureError {
    /// Signal has the wrong number of dimensions
    #[error("Invalid signal shape: got {ndim} dimension(s), expected {expected}")]
    InvalidSignalShape {
        /// Dimensionality of the offending signal
        ndim: usize,
        /// Accepted dimensionality description
        expected: &'static str,
    },

    /// Nested channel rows do not share a common length
    #[error("Ragged channels: channel {channel} has {actual} samples, expected {expected}")]
    RaggedChannels {
        /// Index of the first mismatching row
        channel: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the mismatching row
        actual: usize,
    },

    /// Unknown spectral-estimation method
    #[error("Unsupported spectral method '{method}' (expected 'welch' or 'medfilt')")]
    UnsupportedMethod {
        /// Method name as supplied
        method: String,
    },

    /// Unknown segment averaging rule
    #[error("Unsupported averaging type '{avg_type}' (expected 'mean' or 'median')")]
    UnsupportedAverage {
        /// Averaging name as supplied
        avg_type: String,
    },

    /// No frequency bin falls inside the requested band
    #[error("No frequency bin inside band [{low}, {high}] Hz")]
    EmptyBandSelection {
        /// Lower band edge in Hz
        low: f64,
        /// Upper band edge in Hz
        high: f64,
    },

    /// Band edges violate 0 <= low < high
    #[error("Invalid frequency band [{low}, {high}] Hz")]
    InvalidBand {
        /// Lower band edge in Hz
        low: f64,
        /// Upper band edge in Hz
        high: f64,
    },

    /// Row labels do not match the channel count
    #[error("Channel count mismatch: {expected} channels, {actual} names")]
    ChannelCountMismatch {
        /// Channel count of the signal
        expected: usize,
        /// Number of labels supplied
        actual: usize,
    },

    /// Signal too short for the requested computation
    #[error("Insufficient samples: got {samples}, need at least {required}")]
    InsufficientSamples {
        /// Samples available per channel
        samples: usize,
        /// Minimum samples required
        required: usize,
    },

    /// Hjorth segment size too small for a second difference
    #[error("Invalid segment size {segment_size}, minimum is {min}")]
    InvalidSegmentSize {
        /// Requested segment size
        segment_size: usize,
        /// Smallest accepted segment size
        min: usize,
    },

    /// Sampling frequency is not a positive finite number
    #[error("Invalid sampling frequency: {fs} Hz")]
    InvalidSamplingFrequency {
        /// Supplied sampling frequency
        fs: f64,
    },

    /// Intermediate spectrum contains NaN entries
    #[error("Spectrum contains NaN values")]
    NonFiniteSpectrum,

    /// Welch frequency axis exceeds the Nyquist frequency
    #[error("Frequency {last} Hz exceeds Nyquist frequency {nyquist} Hz")]
    NyquistExceeded {
        /// Highest frequency in the spectrum
        last: f64,
        /// Half the sampling frequency
        nyquist: f64,
    },

    /// Frequency axis length differs from the power's last axis
    #[error("Spectrum shape mismatch: {frequencies} frequencies, {bins} power bins")]
    SpectrumShapeMismatch {
        /// Length of the frequency axis
        frequencies: usize,
        /// Length of the power's last axis
        bins: usize,
    },

    /// FFT backend rejected its buffers
    #[error("FFT failure: {reason}")]
    FftFailure {
        /// Backend error description
        reason: String,
    },

    /// Configuration validation failure
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the problem
        message: String,
    },
}

impl FeatureError {
    /// Shorthand for configuration errors with a formatted message
    pub fn config(message: impl Into<String>) -> Self {
        FeatureError::ConfigurationError {
            message: message.into(),
        }
    }
}

/// Convenience macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::error::FeatureError::ConfigurationError {
            message: format!($($arg)*),
        }
    };
}
