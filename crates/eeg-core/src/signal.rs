//! Signal views: normalising caller data into channel-major arrays
//!
//! Callers hand the feature engines plain slices, nested rows or `ndarray`
//! arrays of any dimensionality. [`AsSignal`] turns each of these into a
//! dynamically-dimensioned view so that shape contracts are checked at run
//! time and reported as [`FeatureError::InvalidSignalShape`].

use crate::error::{FeatureError, FeatureResult};
use ndarray::{Array2, ArrayBase, ArrayView1, ArrayView2, ArrayViewD, Axis, CowArray, Data, Dimension, Ix2, IxDyn};
use serde::{Deserialize, Serialize};

/// Anything that can be viewed as a 1-D or 2-D signal
pub trait AsSignal {
    /// View the data as a dynamically-dimensioned array.
    ///
    /// Borrowed wherever the source layout allows it; nested rows are
    /// copied into a matrix.
    fn as_signal(&self) -> FeatureResult<CowArray<'_, f64, IxDyn>>;
}

impl<S, D> AsSignal for ArrayBase<S, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    fn as_signal(&self) -> FeatureResult<CowArray<'_, f64, IxDyn>> {
        Ok(CowArray::from(self.view().into_dyn()))
    }
}

impl AsSignal for [f64] {
    fn as_signal(&self) -> FeatureResult<CowArray<'_, f64, IxDyn>> {
        Ok(CowArray::from(ArrayView1::from(self).into_dyn()))
    }
}

impl AsSignal for Vec<f64> {
    fn as_signal(&self) -> FeatureResult<CowArray<'_, f64, IxDyn>> {
        self.as_slice().as_signal()
    }
}

impl AsSignal for [Vec<f64>] {
    fn as_signal(&self) -> FeatureResult<CowArray<'_, f64, IxDyn>> {
        let matrix = matrix_from_rows(self)?;
        Ok(CowArray::from(matrix.into_dyn()))
    }
}

impl AsSignal for Vec<Vec<f64>> {
    fn as_signal(&self) -> FeatureResult<CowArray<'_, f64, IxDyn>> {
        self.as_slice().as_signal()
    }
}

impl<T: AsSignal + ?Sized> AsSignal for &T {
    fn as_signal(&self) -> FeatureResult<CowArray<'_, f64, IxDyn>> {
        (**self).as_signal()
    }
}

/// Build a `channels × samples` matrix from nested rows
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> FeatureResult<Array2<f64>> {
    let samples = rows.first().map_or(0, Vec::len);

    if let Some((channel, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != samples) {
        return Err(FeatureError::RaggedChannels {
            channel,
            expected: samples,
            actual: row.len(),
        });
    }

    let data: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), samples), data).map_err(|_| FeatureError::RaggedChannels {
        channel: 0,
        expected: samples,
        actual: 0,
    })
}

/// Layout of a validated signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalShape {
    /// One channel, `samples` long
    Single { samples: usize },
    /// `channels` rows of `samples` each
    Multi { channels: usize, samples: usize },
}

impl SignalShape {
    /// Classify a view, rejecting 0-D and more-than-2-D data
    pub fn of(signal: &ArrayViewD<'_, f64>) -> FeatureResult<Self> {
        match signal.shape() {
            [samples] => Ok(SignalShape::Single { samples: *samples }),
            [channels, samples] => Ok(SignalShape::Multi {
                channels: *channels,
                samples: *samples,
            }),
            other => Err(FeatureError::InvalidSignalShape {
                ndim: other.len(),
                expected: "1 or 2",
            }),
        }
    }

    /// Number of channels (1 for single-channel signals)
    pub fn channel_count(&self) -> usize {
        match self {
            SignalShape::Single { .. } => 1,
            SignalShape::Multi { channels, .. } => *channels,
        }
    }

    /// Samples per channel
    pub fn samples_per_channel(&self) -> usize {
        match self {
            SignalShape::Single { samples } | SignalShape::Multi { samples, .. } => *samples,
        }
    }

    /// Number of array dimensions this shape came from
    pub fn ndim(&self) -> usize {
        match self {
            SignalShape::Single { .. } => 1,
            SignalShape::Multi { .. } => 2,
        }
    }

    pub fn is_multichannel(&self) -> bool {
        matches!(self, SignalShape::Multi { .. })
    }
}

/// View a 1-D or 2-D signal as `channels × samples`.
///
/// Single-channel signals become a one-row matrix.
pub fn channel_matrix<'a>(signal: ArrayViewD<'a, f64>) -> FeatureResult<ArrayView2<'a, f64>> {
    let shape = SignalShape::of(&signal)?;
    let matrix = match shape {
        SignalShape::Single { .. } => signal.insert_axis(Axis(0)),
        SignalShape::Multi { .. } => signal,
    };

    matrix
        .into_dimensionality::<Ix2>()
        .map_err(|_| FeatureError::InvalidSignalShape {
            ndim: shape.ndim(),
            expected: "1 or 2",
        })
}

/// Require an exactly 2-D signal
pub fn require_matrix<'a>(signal: ArrayViewD<'a, f64>) -> FeatureResult<ArrayView2<'a, f64>> {
    let ndim = signal.ndim();
    signal
        .into_dimensionality::<Ix2>()
        .map_err(|_| FeatureError::InvalidSignalShape { ndim, expected: "2" })
}

/// Require an exactly 1-D signal
pub fn require_vector<'a>(signal: ArrayViewD<'a, f64>) -> FeatureResult<ArrayView1<'a, f64>> {
    let ndim = signal.ndim();
    signal
        .into_dimensionality::<ndarray::Ix1>()
        .map_err(|_| FeatureError::InvalidSignalShape { ndim, expected: "1" })
}

/// Validate a sampling frequency in Hz
pub fn validate_sampling_frequency(fs: f64) -> FeatureResult<()> {
    if fs.is_finite() && fs > 0.0 {
        Ok(())
    } else {
        Err(FeatureError::InvalidSamplingFrequency { fs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr0, Array3};

    #[test]
    fn test_slice_is_single_channel() {
        let data = vec![0.0; 1000];
        let view = data.as_signal().unwrap();
        let shape = SignalShape::of(&view.view()).unwrap();

        assert_eq!(shape, SignalShape::Single { samples: 1000 });
        assert_eq!(shape.channel_count(), 1);
        assert!(!shape.is_multichannel());
    }

    #[test]
    fn test_nested_rows_become_matrix() {
        let rows = vec![vec![0.0, 1.0, 2.0], vec![3.0, 4.0, 5.0]];
        let view = rows.as_signal().unwrap();

        assert_eq!(view.shape(), &[2, 3]);
        assert_eq!(view[[1, 0]], 3.0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![0.0, 1.0, 2.0], vec![3.0, 4.0]];
        let err = rows.as_signal().unwrap_err();

        assert_eq!(
            err,
            FeatureError::RaggedChannels { channel: 1, expected: 3, actual: 2 }
        );
    }

    #[test]
    fn test_zero_and_three_dims_rejected() {
        let scalar = arr0(1.0);
        let view = scalar.as_signal().unwrap();
        assert!(matches!(
            SignalShape::of(&view.view()),
            Err(FeatureError::InvalidSignalShape { ndim: 0, .. })
        ));

        let cube = Array3::<f64>::zeros((2, 2, 2));
        let view = cube.as_signal().unwrap();
        assert!(matches!(
            SignalShape::of(&view.view()),
            Err(FeatureError::InvalidSignalShape { ndim: 3, .. })
        ));
    }

    #[test]
    fn test_channel_matrix_promotes_single_channel() {
        let data = vec![1.0, 2.0, 3.0];
        let view = data.as_signal().unwrap();
        let matrix = channel_matrix(view.view()).unwrap();

        assert_eq!(matrix.dim(), (1, 3));
        assert_eq!(matrix[[0, 2]], 3.0);
    }

    #[test]
    fn test_require_matrix() {
        let data = vec![1.0, 2.0, 3.0];
        let view = data.as_signal().unwrap();
        assert!(matches!(
            require_matrix(view.view()),
            Err(FeatureError::InvalidSignalShape { ndim: 1, expected: "2" })
        ));

        let matrix = Array2::<f64>::zeros((4, 10));
        let view = matrix.as_signal().unwrap();
        assert_eq!(require_matrix(view.view()).unwrap().dim(), (4, 10));
    }

    #[test]
    fn test_sampling_frequency_validation() {
        assert!(validate_sampling_frequency(125.0).is_ok());
        assert!(validate_sampling_frequency(0.0).is_err());
        assert!(validate_sampling_frequency(-1.0).is_err());
        assert!(validate_sampling_frequency(f64::NAN).is_err());
    }
}
