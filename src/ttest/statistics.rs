// Single-timepoint Student t-tests
//
// Slice-level tests (one frame's subject vector). The series tester in
// series.rs calls these once per frame.
//
// Conventions:
// - t is the statistic of sample 1 relative to sample 2 (or popmean)
// - too few usable samples => NaN statistic and p-value, never an error
// - zero variance with a non-zero difference => t = ±inf and the limiting p

use crate::descriptive;
use crate::error::{ClusterPermError, Result};
use crate::ttest::config::{NanPolicy, Tail};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Outcome of one t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    /// t-statistic value
    #[serde(with = "crate::float_serde")]
    pub statistic: f64,

    /// p-value for the requested tail
    #[serde(with = "crate::float_serde")]
    pub pvalue: f64,

    /// Degrees of freedom
    #[serde(with = "crate::float_serde")]
    pub df: f64,
}

impl TTestResult {
    /// Result for a test that could not be computed
    pub fn nan() -> Self {
        Self {
            statistic: f64::NAN,
            pvalue: f64::NAN,
            df: f64::NAN,
        }
    }

    fn from_statistic(statistic: f64, df: f64, tail: Tail) -> Self {
        Self {
            statistic,
            pvalue: t_pvalue(statistic, df, tail),
            df,
        }
    }
}

/// p-value of `t` under a Student-t distribution with `df` degrees of freedom
pub fn t_pvalue(t: f64, df: f64, tail: Tail) -> f64 {
    if t.is_nan() {
        return f64::NAN;
    }

    if t.is_infinite() {
        return match tail {
            Tail::Greater if t > 0.0 => 0.0,
            Tail::Greater => 1.0,
            Tail::Less if t < 0.0 => 0.0,
            Tail::Less => 1.0,
            Tail::TwoSided => 0.0,
        };
    }

    if df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }

    let Ok(dist) = StudentsT::new(0.0, 1.0, df) else {
        return f64::NAN;
    };

    match tail {
        Tail::Greater => dist.sf(t),
        Tail::Less => dist.cdf(t),
        Tail::TwoSided => (2.0 * dist.sf(t.abs())).min(1.0),
    }
}

/// Ratio of a mean difference to its standard error, with the zero-variance
/// limits made explicit
fn t_statistic(diff: f64, std_error: f64) -> f64 {
    if diff.is_nan() || std_error.is_nan() {
        f64::NAN
    } else if std_error == 0.0 {
        if diff == 0.0 {
            f64::NAN
        } else {
            diff.signum() * f64::INFINITY
        }
    } else {
        diff / std_error
    }
}

/// Apply the NaN policy: `None` means the result must be NaN
fn usable(values: &[f64], policy: NanPolicy) -> Option<Vec<f64>> {
    match policy {
        NanPolicy::Propagate if values.iter().any(|v| v.is_nan()) => None,
        _ => Some(values.iter().copied().filter(|v| !v.is_nan()).collect()),
    }
}

/// Sum of squared deviations from the mean; a single sample contributes 0
fn sum_of_squares(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    descriptive::variance(values) * (values.len() - 1) as f64
}

/// One-sample t-test of `sample` against `popmean`
///
/// # Example
/// ```
/// use clusterperm::ttest::{ttest_1samp, NanPolicy, Tail};
///
/// let r = ttest_1samp(&[1.0, 2.0, 3.0], 2.0, Tail::TwoSided, NanPolicy::Omit);
/// assert_eq!(r.statistic, 0.0);
/// assert!((r.pvalue - 1.0).abs() < 1e-12);
/// assert_eq!(r.df, 2.0);
/// ```
pub fn ttest_1samp(sample: &[f64], popmean: f64, tail: Tail, nan_policy: NanPolicy) -> TTestResult {
    let Some(x) = usable(sample, nan_policy) else {
        return TTestResult::nan();
    };
    if x.len() < 2 || popmean.is_nan() {
        return TTestResult::nan();
    }

    let n = x.len() as f64;
    let std_error = descriptive::std_dev(&x) / n.sqrt();
    let t = t_statistic(descriptive::mean(&x) - popmean, std_error);
    TTestResult::from_statistic(t, n - 1.0, tail)
}

/// Dependent-samples t-test on positionally paired observations
///
/// With [`NanPolicy::Omit`] a pair is dropped when either member is NaN.
///
/// # Errors
/// `ShapeMismatch` when the samples have different lengths.
pub fn ttest_rel(a: &[f64], b: &[f64], tail: Tail, nan_policy: NanPolicy) -> Result<TTestResult> {
    if a.len() != b.len() {
        return Err(ClusterPermError::subjects("paired t-test", a.len(), b.len()));
    }

    let differences: Vec<f64> = a.iter().zip(b).map(|(x, y)| x - y).collect();
    Ok(ttest_1samp(&differences, 0.0, tail, nan_policy))
}

/// Two-sample t-test on independent samples
///
/// `equal_var = true` pools the variances (df = n1 + n2 − 2); `false`
/// runs Welch's test with Welch–Satterthwaite degrees of freedom.
pub fn ttest_ind(
    a: &[f64],
    b: &[f64],
    equal_var: bool,
    tail: Tail,
    nan_policy: NanPolicy,
) -> TTestResult {
    let (Some(a), Some(b)) = (usable(a, nan_policy), usable(b, nan_policy)) else {
        return TTestResult::nan();
    };

    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (m1, m2) = (descriptive::mean(&a), descriptive::mean(&b));

    if equal_var {
        let df = n1 + n2 - 2.0;
        if a.is_empty() || b.is_empty() || df < 1.0 {
            return TTestResult::nan();
        }
        let pooled = (sum_of_squares(&a) + sum_of_squares(&b)) / df;
        let std_error = (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
        TTestResult::from_statistic(t_statistic(m1 - m2, std_error), df, tail)
    } else {
        if a.len() < 2 || b.len() < 2 {
            return TTestResult::nan();
        }
        let vn1 = descriptive::variance(&a) / n1;
        let vn2 = descriptive::variance(&b) / n2;
        let std_error = (vn1 + vn2).sqrt();
        let df = (vn1 + vn2).powi(2) / (vn1.powi(2) / (n1 - 1.0) + vn2.powi(2) / (n2 - 1.0));
        TTestResult::from_statistic(t_statistic(m1 - m2, std_error), df, tail)
    }
}
