//! Hjorth parameters from segment-wise moments
//!
//! A channel is cut into contiguous, non-overlapping segments of
//! `segment_size` samples (a trailing partial segment is dropped). For each
//! segment the population variance of the samples (activity), of their first
//! difference (mobility) and of their second difference (complexity) is
//! taken; the reported parameters are the mean and population standard
//! deviation of those three series across segments.

use crate::stats;
use eeg_core::signal::{require_matrix, require_vector};
use eeg_core::{AsSignal, FeatureError, FeatureResult};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::debug;

/// Segment length used when none is configured
pub const DEFAULT_SEGMENT_SIZE: usize = 10;

/// Shortest segment with a non-empty second difference
pub const MIN_SEGMENT_SIZE: usize = 3;

/// Hjorth statistics of one channel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HjorthParameters {
    pub mean_activity: f64,
    pub mean_mobility: f64,
    pub mean_complexity: f64,
    pub std_activity: f64,
    pub std_mobility: f64,
    pub std_complexity: f64,
}

impl HjorthParameters {
    /// Values in [`HjorthTable::COLUMNS`] order
    pub fn values(&self) -> [f64; 6] {
        [
            self.mean_activity,
            self.mean_mobility,
            self.mean_complexity,
            self.std_activity,
            self.std_mobility,
            self.std_complexity,
        ]
    }

    /// Look a field up by its column name
    pub fn get(&self, column: &str) -> Option<f64> {
        HjorthTable::COLUMNS
            .iter()
            .position(|name| *name == column)
            .map(|idx| self.values()[idx])
    }

    pub fn is_finite(&self) -> bool {
        self.values().iter().all(|v| v.is_finite())
    }
}

/// Hjorth parameters of a 1-D signal
pub fn hjorth_parameters<S>(signal: &S, segment_size: usize) -> FeatureResult<HjorthParameters>
where
    S: AsSignal + ?Sized,
{
    let signal = signal.as_signal()?;
    let samples = require_vector(signal.view())?;
    channel_parameters(samples, segment_size)
}

fn channel_parameters(channel: ArrayView1<'_, f64>, segment_size: usize) -> FeatureResult<HjorthParameters> {
    if segment_size < MIN_SEGMENT_SIZE {
        return Err(FeatureError::InvalidSegmentSize {
            segment_size,
            min: MIN_SEGMENT_SIZE,
        });
    }

    let samples = channel.len();
    let n_segments = samples / segment_size;
    if n_segments == 0 {
        return Err(FeatureError::InsufficientSamples {
            samples,
            required: segment_size,
        });
    }

    let data: Cow<'_, [f64]> = match channel.as_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(channel.to_vec()),
    };

    let mut activities = Vec::with_capacity(n_segments);
    let mut mobilities = Vec::with_capacity(n_segments);
    let mut complexities = Vec::with_capacity(n_segments);

    for segment in data.chunks_exact(segment_size) {
        let first = stats::diff(segment);
        let second = stats::diff(&first);

        activities.push(stats::variance(segment));
        mobilities.push(stats::variance(&first));
        complexities.push(stats::variance(&second));
    }

    debug!(samples, segment_size, n_segments, "Hjorth segmentation");

    Ok(HjorthParameters {
        mean_activity: stats::mean(&activities),
        mean_mobility: stats::mean(&mobilities),
        mean_complexity: stats::mean(&complexities),
        std_activity: stats::std_dev(&activities),
        std_mobility: stats::std_dev(&mobilities),
        std_complexity: stats::std_dev(&complexities),
    })
}

/// Per-channel Hjorth parameters with optional row labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HjorthTable {
    labels: Option<Vec<String>>,
    rows: Vec<HjorthParameters>,
}

impl HjorthTable {
    /// Column names in field order
    pub const COLUMNS: [&'static str; 6] = [
        "mean_activity",
        "mean_mobility",
        "mean_complexity",
        "std_activity",
        "std_mobility",
        "std_complexity",
    ];

    /// Number of rows (channels)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[HjorthParameters] {
        &self.rows
    }

    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    pub fn row(&self, index: usize) -> Option<&HjorthParameters> {
        self.rows.get(index)
    }

    /// Row whose label equals `name`; `None` for unlabelled tables
    pub fn row_by_label(&self, name: &str) -> Option<&HjorthParameters> {
        let labels = self.labels.as_ref()?;
        labels
            .iter()
            .position(|label| label == name)
            .and_then(|idx| self.rows.get(idx))
    }

    /// One column across all rows
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = Self::COLUMNS.iter().position(|column| *column == name)?;
        Some(self.rows.iter().map(|row| row.values()[idx]).collect())
    }
}

/// Hjorth parameters of every channel of a 2-D signal.
///
/// `channel_names`, when given, must name every channel and become the row
/// labels.
pub fn hjorth_table<S>(
    signal: &S,
    segment_size: usize,
    channel_names: Option<&[String]>,
) -> FeatureResult<HjorthTable>
where
    S: AsSignal + ?Sized,
{
    let signal = signal.as_signal()?;
    let channels = require_matrix(signal.view())?;

    if let Some(names) = channel_names {
        if names.len() != channels.nrows() {
            return Err(FeatureError::ChannelCountMismatch {
                expected: channels.nrows(),
                actual: names.len(),
            });
        }
    }

    let rows = channels
        .rows()
        .into_iter()
        .map(|row| channel_parameters(row, segment_size))
        .collect::<FeatureResult<Vec<_>>>()?;

    Ok(HjorthTable {
        labels: channel_names.map(<[String]>::to_vec),
        rows,
    })
}
