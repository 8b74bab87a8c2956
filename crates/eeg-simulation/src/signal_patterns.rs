//! Waveform shapes for synthetic EEG channels

use eeg_core::{config_error, FeatureResult};
use serde::{Deserialize, Serialize};

/// Predefined EEG signal patterns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalPattern {
    /// `a·sin(t) + b·cos(t)` with `t` advancing one radian per sample and
    /// per-channel integer amplitudes `a, b` drawn from `1..=10`
    Mixture,
    /// Pure oscillation at `frequency` Hz
    Rhythm { frequency: f64, amplitude: f64 },
    /// All zeros
    Flat,
}

impl SignalPattern {
    /// Check pattern parameters
    pub fn validate(&self) -> FeatureResult<()> {
        if let SignalPattern::Rhythm { frequency, amplitude } = self {
            if !(frequency.is_finite() && *frequency > 0.0) {
                return Err(config_error!("Rhythm frequency must be positive, got {} Hz", frequency));
            }
            if !amplitude.is_finite() {
                return Err(config_error!("Rhythm amplitude must be finite, got {}", amplitude));
            }
        }
        Ok(())
    }

    /// Get pattern description
    pub fn description(&self) -> &'static str {
        match self {
            SignalPattern::Mixture => "Random sine/cosine mixture",
            SignalPattern::Rhythm { .. } => "Single rhythm",
            SignalPattern::Flat => "Flat line",
        }
    }

    /// Common resting-state rhythms
    pub fn presets() -> Vec<(&'static str, SignalPattern)> {
        vec![
            ("Mixture", SignalPattern::Mixture),
            ("Delta sleep", SignalPattern::Rhythm { frequency: 2.0, amplitude: 50.0 }),
            ("Theta drowsy", SignalPattern::Rhythm { frequency: 6.0, amplitude: 30.0 }),
            ("Alpha rest", SignalPattern::Rhythm { frequency: 10.0, amplitude: 20.0 }),
            ("Beta active", SignalPattern::Rhythm { frequency: 20.0, amplitude: 10.0 }),
            ("Flat", SignalPattern::Flat),
        ]
    }
}
