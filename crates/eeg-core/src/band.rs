//! Frequency band definitions for spectral analysis

use crate::error::{FeatureError, FeatureResult};
use serde::{Deserialize, Serialize};

/// Closed frequency interval `[low, high]` in Hz
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    pub low: f64,
    pub high: f64,
}

impl FrequencyBand {
    /// Create a band, enforcing `0 <= low < high`
    pub fn new(low: f64, high: f64) -> FeatureResult<Self> {
        let band = FrequencyBand { low, high };
        band.validate()?;
        Ok(band)
    }

    /// Check the band edges
    pub fn validate(&self) -> FeatureResult<()> {
        if self.low.is_finite() && self.high.is_finite() && 0.0 <= self.low && self.low < self.high {
            Ok(())
        } else {
            Err(FeatureError::InvalidBand {
                low: self.low,
                high: self.high,
            })
        }
    }

    /// Inclusive membership test
    pub fn contains(&self, frequency: f64) -> bool {
        self.low <= frequency && frequency <= self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

impl TryFrom<(f64, f64)> for FrequencyBand {
    type Error = FeatureError;

    fn try_from((low, high): (f64, f64)) -> FeatureResult<Self> {
        FrequencyBand::new(low, high)
    }
}

impl TryFrom<[f64; 2]> for FrequencyBand {
    type Error = FeatureError;

    fn try_from([low, high]: [f64; 2]) -> FeatureResult<Self> {
        FrequencyBand::new(low, high)
    }
}

impl std::fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{} Hz", self.low, self.high)
    }
}

/// A band with a display name, used for report columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedBand {
    pub name: String,
    pub low: f64,
    pub high: f64,
}

impl NamedBand {
    pub fn new(name: &str, low: f64, high: f64) -> Self {
        NamedBand {
            name: name.to_string(),
            low,
            high,
        }
    }

    /// Validated frequency interval of this band
    pub fn band(&self) -> FeatureResult<FrequencyBand> {
        FrequencyBand::new(self.low, self.high)
    }

    /// Classic clinical EEG rhythms
    pub fn clinical_bands() -> Vec<NamedBand> {
        vec![
            NamedBand::new("delta", 1.0, 4.0),
            NamedBand::new("theta", 4.0, 8.0),
            NamedBand::new("alpha", 8.0, 13.0),
            NamedBand::new("beta", 13.0, 30.0),
            NamedBand::new("gamma", 30.0, 45.0),
        ]
    }

    /// Contiguous 4 Hz bands from 1 to 20 Hz, suited to 125 Hz recordings
    pub fn low_frequency_bands() -> Vec<NamedBand> {
        vec![
            NamedBand::new("1-4Hz", 1.0, 4.0),
            NamedBand::new("4-8Hz", 4.0, 8.0),
            NamedBand::new("8-12Hz", 8.0, 12.0),
            NamedBand::new("12-16Hz", 12.0, 16.0),
            NamedBand::new("16-20Hz", 16.0, 20.0),
        ]
    }
}

/// Validate a list of named bands, preserving order
pub fn resolve_bands(bands: &[NamedBand]) -> FeatureResult<Vec<FrequencyBand>> {
    bands.iter().map(NamedBand::band).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_validation() {
        assert!(FrequencyBand::new(0.0, 4.0).is_ok());
        assert!(FrequencyBand::new(8.0, 12.0).is_ok());

        assert!(matches!(
            FrequencyBand::new(4.0, 4.0),
            Err(FeatureError::InvalidBand { .. })
        ));
        assert!(FrequencyBand::new(12.0, 8.0).is_err());
        assert!(FrequencyBand::new(-1.0, 8.0).is_err());
        assert!(FrequencyBand::new(1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_inclusive_bounds() {
        let band = FrequencyBand::new(8.0, 12.0).unwrap();
        assert!(band.contains(8.0));
        assert!(band.contains(12.0));
        assert!(!band.contains(12.5));
        assert_eq!(band.width(), 4.0);
    }

    #[test]
    fn test_conversions() {
        let band: FrequencyBand = (1.0, 4.0).try_into().unwrap();
        assert_eq!(band, FrequencyBand { low: 1.0, high: 4.0 });

        let result: FeatureResult<FrequencyBand> = [4.0, 1.0].try_into();
        assert!(result.is_err());
    }

    #[test]
    fn test_presets_are_valid_and_ordered() {
        let bands = resolve_bands(&NamedBand::low_frequency_bands()).unwrap();
        assert_eq!(bands.len(), 5);
        assert_eq!(bands[0], FrequencyBand { low: 1.0, high: 4.0 });
        assert_eq!(bands[4], FrequencyBand { low: 16.0, high: 20.0 });

        assert!(resolve_bands(&NamedBand::clinical_bands()).is_ok());
    }

    #[test]
    fn test_named_band_serialization() {
        let band = NamedBand::new("alpha", 8.0, 13.0);
        let json = serde_json::to_string(&band).unwrap();
        let back: NamedBand = serde_json::from_str(&json).unwrap();
        assert_eq!(band, back);
    }
}
