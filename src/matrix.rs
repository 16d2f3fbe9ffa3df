//! Frame-major time-by-subject matrix
//!
//! Each frame (timepoint) holds one value per subject. Subject columns are
//! positional and must line up across frames and across the conditions being
//! compared. Missing samples are `f64::NAN`.

use crate::error::{ClusterPermError, Result};
use serde::{Deserialize, Serialize};

/// Immutable matrix of `n_frames × n_subjects` observations
///
/// Storage is a single contiguous buffer in frame-major order, so
/// [`TimeSeriesMatrix::frame`] is a borrowed slice and the matrix can be
/// shared across permutation workers without copying.
///
/// # Example
/// ```
/// use clusterperm::TimeSeriesMatrix;
///
/// let m = TimeSeriesMatrix::from_frames(vec![vec![1.0, 2.0], vec![3.0, 4.0]])?;
/// assert_eq!(m.n_frames(), 2);
/// assert_eq!(m.n_subjects(), 2);
/// assert_eq!(m.frame(1), &[3.0, 4.0]);
/// # Ok::<(), clusterperm::ClusterPermError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FrameRows", into = "FrameRows")]
pub struct TimeSeriesMatrix {
    values: Vec<f64>,
    n_frames: usize,
    n_subjects: usize,
}

impl TimeSeriesMatrix {
    /// Build from frame-major rows (`frames[t][subject]`)
    ///
    /// # Errors
    /// `RaggedFrame` if any frame's length differs from frame 0.
    pub fn from_frames(frames: Vec<Vec<f64>>) -> Result<Self> {
        let n_frames = frames.len();
        let n_subjects = frames.first().map_or(0, Vec::len);

        let mut values = Vec::with_capacity(n_frames * n_subjects);
        for (frame, row) in frames.into_iter().enumerate() {
            if row.len() != n_subjects {
                return Err(ClusterPermError::RaggedFrame {
                    frame,
                    expected: n_subjects,
                    actual: row.len(),
                });
            }
            values.extend(row);
        }

        Ok(Self {
            values,
            n_frames,
            n_subjects,
        })
    }

    /// Build from subject-major rows (`series[subject][t]`)
    ///
    /// Convenient when each subject's trace arrives as one vector.
    pub fn from_subject_series(series: &[Vec<f64>]) -> Result<Self> {
        let n_subjects = series.len();
        let n_frames = series.first().map_or(0, Vec::len);

        if let Some(row) = series.iter().find(|row| row.len() != n_frames) {
            return Err(ClusterPermError::frames(
                "subject series",
                n_frames,
                row.len(),
            ));
        }

        Ok(Self::from_fn(n_frames, n_subjects, |frame, subject| {
            series[subject][frame]
        }))
    }

    /// Build by evaluating `f(frame, subject)` for every cell
    pub fn from_fn<F>(n_frames: usize, n_subjects: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut values = Vec::with_capacity(n_frames * n_subjects);
        for frame in 0..n_frames {
            for subject in 0..n_subjects {
                values.push(f(frame, subject));
            }
        }
        Self {
            values,
            n_frames,
            n_subjects,
        }
    }

    /// Number of timepoints
    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    /// Number of subjects per frame
    pub fn n_subjects(&self) -> usize {
        self.n_subjects
    }

    /// Subject values at one timepoint
    ///
    /// # Panics
    /// Panics if `frame >= n_frames()`.
    pub fn frame(&self, frame: usize) -> &[f64] {
        assert!(frame < self.n_frames, "frame {} out of range", frame);
        let start = frame * self.n_subjects;
        &self.values[start..start + self.n_subjects]
    }

    /// Iterate frames in temporal order
    pub fn frames(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.n_frames).map(move |frame| self.frame(frame))
    }

    /// Single observation, `None` when out of range
    pub fn get(&self, frame: usize, subject: usize) -> Option<f64> {
        if frame < self.n_frames && subject < self.n_subjects {
            Some(self.values[frame * self.n_subjects + subject])
        } else {
            None
        }
    }

    /// One subject's full time series
    pub fn subject_series(&self, subject: usize) -> Option<Vec<f64>> {
        if subject >= self.n_subjects {
            return None;
        }
        Some(self.frames().map(|row| row[subject]).collect())
    }

    /// True when any observation is missing
    pub fn has_nan(&self) -> bool {
        self.values.iter().any(|v| v.is_nan())
    }

    /// New matrix holding the given subject columns, in the given order
    ///
    /// # Panics
    /// Panics if an index is `>= n_subjects()`.
    pub fn select_subjects(&self, subjects: &[usize]) -> Self {
        Self::from_fn(self.n_frames, subjects.len(), |frame, column| {
            self.values[frame * self.n_subjects + subjects[column]]
        })
    }

    /// Pool subjects of `self` followed by those of `other`, frame by frame
    ///
    /// # Errors
    /// `ShapeMismatch` when the frame counts differ.
    pub fn concat_subjects(&self, other: &Self) -> Result<Self> {
        if self.n_frames != other.n_frames {
            return Err(ClusterPermError::frames(
                "subject pooling",
                self.n_frames,
                other.n_frames,
            ));
        }
        let n1 = self.n_subjects;
        Ok(Self::from_fn(
            self.n_frames,
            n1 + other.n_subjects,
            |frame, subject| {
                if subject < n1 {
                    self.values[frame * n1 + subject]
                } else {
                    other.values[frame * other.n_subjects + subject - n1]
                }
            },
        ))
    }

    /// Apply `f` to every observation, returning a new matrix
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            values: self.values.iter().map(|&v| f(v)).collect(),
            n_frames: self.n_frames,
            n_subjects: self.n_subjects,
        }
    }

    /// Copy out as nested frame-major rows
    pub fn to_frames(&self) -> Vec<Vec<f64>> {
        self.frames().map(<[f64]>::to_vec).collect()
    }
}

/// Serialized form: frame-major rows, NaN as `null`
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct FrameRows(#[serde(with = "crate::float_serde::nested")] Vec<Vec<f64>>);

impl TryFrom<FrameRows> for TimeSeriesMatrix {
    type Error = ClusterPermError;

    fn try_from(rows: FrameRows) -> Result<Self> {
        Self::from_frames(rows.0)
    }
}

impl From<TimeSeriesMatrix> for FrameRows {
    fn from(matrix: TimeSeriesMatrix) -> Self {
        FrameRows(matrix.to_frames())
    }
}

impl TryFrom<Vec<Vec<f64>>> for TimeSeriesMatrix {
    type Error = ClusterPermError;

    fn try_from(frames: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_frames(frames)
    }
}

impl From<TimeSeriesMatrix> for Vec<Vec<f64>> {
    fn from(matrix: TimeSeriesMatrix) -> Self {
        matrix.to_frames()
    }
}
