// Serial t-tests: one test per timepoint across subjects
//
// Shape checks happen once, up front, and fail the whole call. After that
// every frame is tested independently; a frame without enough data yields
// NaN without aborting the series.

use crate::error::{ClusterPermError, Result};
use crate::matrix::TimeSeriesMatrix;
use crate::ttest::config::{Design, TestOptions};
use crate::ttest::statistics::{ttest_1samp, ttest_ind, ttest_rel, TTestResult};
use serde::{Deserialize, Serialize};

/// What condition 1 is compared against
#[derive(Debug, Clone, Copy)]
pub enum Comparand<'a> {
    /// A second condition (paired and independent designs)
    Condition(&'a TimeSeriesMatrix),
    /// A fixed population mean (one-sample design)
    PopulationMean(f64),
}

/// Per-timepoint test statistics, p-values and degrees of freedom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSeries {
    #[serde(with = "crate::float_serde::vec")]
    pub t: Vec<f64>,
    #[serde(with = "crate::float_serde::vec")]
    pub p: Vec<f64>,
    #[serde(with = "crate::float_serde::vec")]
    pub df: Vec<f64>,
}

impl StatSeries {
    /// Number of timepoints
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Timepoints whose test could not be computed
    pub fn undefined_frames(&self) -> Vec<usize> {
        self.p
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_nan())
            .map(|(frame, _)| frame)
            .collect()
    }

    fn from_results(results: Vec<TTestResult>) -> Self {
        let mut series = Self {
            t: Vec::with_capacity(results.len()),
            p: Vec::with_capacity(results.len()),
            df: Vec::with_capacity(results.len()),
        };
        for r in results {
            series.t.push(r.statistic);
            series.p.push(r.pvalue);
            series.df.push(r.df);
        }
        series
    }
}

/// Check that `design` and `comparand` agree and that shapes line up
fn check_shapes(cond1: &TimeSeriesMatrix, comparand: Comparand<'_>, design: Design) -> Result<()> {
    match (design, comparand) {
        (Design::OneSample, Comparand::PopulationMean(popmean)) => {
            if popmean.is_nan() {
                return Err(ClusterPermError::InvalidConfig(
                    "population mean must not be NaN".to_string(),
                ));
            }
            Ok(())
        }
        (Design::OneSample, Comparand::Condition(_)) => Err(ClusterPermError::ComparandMismatch {
            design: "one-sample",
            required: "a population mean",
        }),
        (_, Comparand::PopulationMean(_)) => Err(ClusterPermError::ComparandMismatch {
            design: design.name(),
            required: "a second condition",
        }),
        (Design::Paired, Comparand::Condition(cond2)) => {
            if cond1.n_frames() != cond2.n_frames() {
                return Err(ClusterPermError::frames(
                    "paired t-test",
                    cond1.n_frames(),
                    cond2.n_frames(),
                ));
            }
            if cond1.n_subjects() != cond2.n_subjects() {
                return Err(ClusterPermError::subjects(
                    "paired t-test",
                    cond1.n_subjects(),
                    cond2.n_subjects(),
                ));
            }
            Ok(())
        }
        (Design::Independent, Comparand::Condition(cond2)) => {
            if cond1.n_frames() != cond2.n_frames() {
                return Err(ClusterPermError::frames(
                    "independent t-test",
                    cond1.n_frames(),
                    cond2.n_frames(),
                ));
            }
            Ok(())
        }
    }
}

/// Run one t-test per timepoint
///
/// # Arguments
/// * `cond1` - Condition 1, frames × subjects
/// * `comparand` - Condition 2, or the population mean for one-sample
/// * `design` - How observations are paired
/// * `options` - Tail, NaN policy and variance assumption
///
/// # Errors
/// `ShapeMismatch` for incompatible frame/subject counts,
/// `ComparandMismatch` when the comparand does not fit the design.
///
/// # Example
/// ```
/// use clusterperm::{serial_ttest, Comparand, Design, TestOptions, TimeSeriesMatrix};
///
/// let cond1 = TimeSeriesMatrix::from_frames(vec![vec![1.0, 2.0, 4.0]; 5])?;
/// let cond2 = cond1.map(|v| v + 5.0);
/// let stats = serial_ttest(&cond1, Comparand::Condition(&cond2), Design::Paired, &TestOptions::default())?;
/// assert_eq!(stats.len(), 5);
/// assert!(stats.p.iter().all(|&p| p < 1e-6));
/// # Ok::<(), clusterperm::ClusterPermError>(())
/// ```
pub fn serial_ttest(
    cond1: &TimeSeriesMatrix,
    comparand: Comparand<'_>,
    design: Design,
    options: &TestOptions,
) -> Result<StatSeries> {
    check_shapes(cond1, comparand, design)?;

    tracing::debug!(
        "serial {} t-test: {} frames, {} subjects in condition 1",
        design,
        cond1.n_frames(),
        cond1.n_subjects()
    );

    let tail = options.tail;
    let nan_policy = options.nan_policy;

    let results: Vec<TTestResult> = match comparand {
        Comparand::PopulationMean(popmean) => cond1
            .frames()
            .map(|row| ttest_1samp(row, popmean, tail, nan_policy))
            .collect(),
        Comparand::Condition(cond2) => {
            let mut results = Vec::with_capacity(cond1.n_frames());
            for (row1, row2) in cond1.frames().zip(cond2.frames()) {
                let r = match design {
                    Design::Paired => ttest_rel(row1, row2, tail, nan_policy)?,
                    _ => ttest_ind(row1, row2, options.equal_var, tail, nan_policy),
                };
                results.push(r);
            }
            results
        }
    };

    let series = StatSeries::from_results(results);

    let undefined = series.undefined_frames();
    if !undefined.is_empty() {
        tracing::warn!(
            "{} of {} timepoints had insufficient data for a t-test (first: frame {})",
            undefined.len(),
            series.len(),
            undefined[0]
        );
    }

    Ok(series)
}
