//! Empirical p-values from a reference distribution
//!
//! Scores an observed statistic against a null distribution built by
//! permutation. The percentile rank is the fraction of the distribution at
//! or below the observed value; the tail decides which side is reported.

use crate::error::{ClusterPermError, Result};
use crate::ttest::Tail;
use serde::{Deserialize, Serialize};

/// How ties with the observed score count toward its percentile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PercentileKind {
    /// Fraction of values `<= score`
    #[default]
    Weak,
    /// Fraction of values `< score`
    Strict,
    /// Average of `Weak` and `Strict`
    Mean,
    /// Average rank of the score among tied values (equals `Mean`)
    Rank,
}

/// Percentile rank of `score` in `distribution`, as a fraction in [0, 1]
///
/// NaN entries are ignored.
///
/// # Errors
/// `EmptyDistribution` when no non-NaN values remain.
pub fn percentile_of_score(distribution: &[f64], score: f64, kind: PercentileKind) -> Result<f64> {
    let mut n = 0usize;
    let mut below = 0usize;
    let mut tied = 0usize;

    for &v in distribution.iter().filter(|v| !v.is_nan()) {
        n += 1;
        if v < score {
            below += 1;
        } else if v == score {
            tied += 1;
        }
    }

    if n == 0 {
        return Err(ClusterPermError::EmptyDistribution);
    }

    let n = n as f64;
    let weak = (below + tied) as f64 / n;
    let strict = below as f64 / n;

    Ok(match kind {
        PercentileKind::Weak => weak,
        PercentileKind::Strict => strict,
        PercentileKind::Mean | PercentileKind::Rank => (weak + strict) / 2.0,
    })
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Tail-aware empirical p-value, rounded to 3 decimals
///
/// - `Greater`: 1 − percentile
/// - `Less`: percentile
/// - `TwoSided`: 2 × percentile below the median, 2 × (1 − percentile)
///   otherwise; only exact for a symmetric distribution
///
/// # Example
/// ```
/// use clusterperm::{p_value, Tail};
///
/// let null: Vec<f64> = (1..=100).map(f64::from).collect();
/// assert_eq!(p_value(&null, 95.0, Tail::Greater)?, 0.05);
/// assert_eq!(p_value(&null, 95.0, Tail::Less)?, 0.95);
/// assert_eq!(p_value(&null, 95.0, Tail::TwoSided)?, 0.1);
/// # Ok::<(), clusterperm::ClusterPermError>(())
/// ```
pub fn p_value(distribution: &[f64], observed: f64, tail: Tail) -> Result<f64> {
    p_value_with(distribution, observed, tail, PercentileKind::Weak)
}

/// [`p_value`] with an explicit tie convention
pub fn p_value_with(
    distribution: &[f64],
    observed: f64,
    tail: Tail,
    kind: PercentileKind,
) -> Result<f64> {
    let percentile = percentile_of_score(distribution, observed, kind)?;

    let p = match tail {
        Tail::Greater => 1.0 - percentile,
        Tail::Less => percentile,
        Tail::TwoSided if percentile < 0.5 => 2.0 * percentile,
        Tail::TwoSided => 2.0 * (1.0 - percentile),
    };

    Ok(round3(p))
}
