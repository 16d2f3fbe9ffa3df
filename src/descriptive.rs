//! NaN-omitting descriptive statistics
//!
//! Primitives shared by the cluster descriptives and by reporting code that
//! plots grand-average waveforms. Every function skips NaN samples and
//! returns NaN when nothing is left.

use crate::matrix::TimeSeriesMatrix;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};

fn non_nan(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| !v.is_nan())
}

/// Number of non-NaN samples
pub fn count(values: &[f64]) -> usize {
    non_nan(values).count()
}

/// Sum of non-NaN samples (0.0 for an empty slice)
pub fn sum(values: &[f64]) -> f64 {
    non_nan(values).sum()
}

/// Arithmetic mean of non-NaN samples
pub fn mean(values: &[f64]) -> f64 {
    non_nan(values).mean()
}

/// Sample variance (n − 1 denominator) of non-NaN samples
pub fn variance(values: &[f64]) -> f64 {
    non_nan(values).variance()
}

/// Sample standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    non_nan(values).std_dev()
}

/// Median of non-NaN samples; even counts average the two middle values
pub fn median(values: &[f64]) -> f64 {
    let samples: Vec<f64> = non_nan(values).collect();
    if samples.is_empty() {
        return f64::NAN;
    }
    let mut data = Data::new(samples);
    data.median()
}

/// Smallest non-NaN sample
pub fn min(values: &[f64]) -> f64 {
    Statistics::min(non_nan(values))
}

/// Largest non-NaN sample
pub fn max(values: &[f64]) -> f64 {
    Statistics::max(non_nan(values))
}

/// Per-frame summary across subjects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    #[serde(with = "crate::float_serde")]
    pub mean: f64,
    #[serde(with = "crate::float_serde")]
    pub std_dev: f64,
    /// Standard error of the mean
    #[serde(with = "crate::float_serde")]
    pub std_error: f64,
    /// Subjects contributing a non-NaN value
    pub n: usize,
}

/// Mean, SD and SE of every frame (the grand-average waveform)
pub fn frame_summary(matrix: &TimeSeriesMatrix) -> Vec<FrameSummary> {
    matrix
        .frames()
        .map(|row| {
            let n = count(row);
            let sd = std_dev(row);
            FrameSummary {
                mean: mean(row),
                std_dev: sd,
                std_error: sd / (n as f64).sqrt(),
                n,
            }
        })
        .collect()
}
