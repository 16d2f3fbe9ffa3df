// Cluster detection over a p-value sequence
//
// Three passes, each producing a fresh Vec:
//   1. boundary scan  -> raw significant runs
//   2. merge          -> runs separated by <= merge_margin frames joined
//   3. filter         -> runs with offset - onset < min_cluster_size dropped
// then per-cluster descriptives of t over [onset, offset].

use crate::cluster::config::ClusterConfig;
use crate::descriptive;
use crate::error::{ClusterPermError, Result};
use crate::ttest::{StatSeries, Tail};
use serde::{Deserialize, Serialize};

/// Inclusive frame interval `[onset, offset]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub onset: usize,
    pub offset: usize,
}

impl Span {
    /// Number of frames covered
    pub fn frames(&self) -> usize {
        self.offset - self.onset + 1
    }
}

/// Contiguous run of significant timepoints with t descriptives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub onset: usize,
    pub offset: usize,
    #[serde(with = "crate::float_serde")]
    pub sum: f64,
    #[serde(with = "crate::float_serde")]
    pub mean: f64,
    #[serde(with = "crate::float_serde")]
    pub min: f64,
    #[serde(with = "crate::float_serde")]
    pub max: f64,
}

impl Cluster {
    fn from_span(span: Span, t: &[f64]) -> Self {
        let values = &t[span.onset..=span.offset];
        Self {
            onset: span.onset,
            offset: span.offset,
            sum: descriptive::sum(values),
            mean: descriptive::mean(values),
            min: descriptive::min(values),
            max: descriptive::max(values),
        }
    }

    pub fn span(&self) -> Span {
        Span {
            onset: self.onset,
            offset: self.offset,
        }
    }

    /// Number of frames covered
    pub fn frames(&self) -> usize {
        self.span().frames()
    }

    /// Scalar summary used as the cluster-level test statistic
    pub fn statistic(&self, kind: ClusterStatistic) -> f64 {
        match kind {
            ClusterStatistic::Sum => self.sum,
            ClusterStatistic::Mean => self.mean,
            ClusterStatistic::Max => self.max,
            ClusterStatistic::Min => self.min,
            ClusterStatistic::Size => self.frames() as f64,
        }
    }
}

/// Which cluster descriptive serves as the cluster-level statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterStatistic {
    /// Cluster mass: sum of t over the cluster
    #[default]
    Sum,
    Mean,
    Max,
    Min,
    /// Number of frames
    Size,
}

/// Raw significant runs, in temporal order
///
/// Walks adjacent pairs `(i, i + 1)` for `i` in `0..=T-2`: a
/// non-significant → significant step opens a run at `i + 1`, a
/// significant → non-significant step closes it at `i`. The last pair closes
/// any run still open at `T - 1`, which turns a lone trailing significant
/// frame into a one-frame run. A sequence that starts significant opens at 0.
/// NaN p-values are non-significant.
pub fn scan_boundaries(p: &[f64], threshold: f64) -> Vec<Span> {
    let significant = |i: usize| p[i] <= threshold;
    let n = p.len();

    match n {
        0 => return Vec::new(),
        1 => {
            return if significant(0) {
                vec![Span {
                    onset: 0,
                    offset: 0,
                }]
            } else {
                Vec::new()
            };
        }
        _ => {}
    }

    let mut spans = Vec::new();
    let mut open = significant(0).then_some(0);

    for i in 0..n - 1 {
        let (here, next) = (significant(i), significant(i + 1));

        if !here && next {
            open = Some(i + 1);
        }
        if here && !next {
            if let Some(onset) = open.take() {
                spans.push(Span { onset, offset: i });
            }
        }
        if i == n - 2 && next {
            if let Some(onset) = open.take() {
                spans.push(Span {
                    onset,
                    offset: n - 1,
                });
            }
        }
    }

    spans
}

/// Join neighbouring runs separated by at most `merge_margin` non-significant frames
///
/// A single forward pass: each run either extends the last kept run or
/// starts a new one, so chains of close runs collapse into one span.
pub fn merge_spans(spans: &[Span], merge_margin: usize) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());

    for &span in spans {
        if let Some(last) = merged.last_mut() {
            let gap = span.onset.saturating_sub(last.offset + 1);
            if gap <= merge_margin {
                last.offset = span.offset;
                continue;
            }
        }
        merged.push(span);
    }

    merged
}

/// Drop runs whose `offset - onset` is below `min_cluster_size`
pub fn filter_spans(spans: &[Span], min_cluster_size: usize) -> Vec<Span> {
    spans
        .iter()
        .copied()
        .filter(|s| s.offset - s.onset >= min_cluster_size)
        .collect()
}

/// Detect clusters from parallel p and t sequences
///
/// # Errors
/// `ShapeMismatch` when `p` and `t` differ in length, `InvalidConfig` for
/// an out-of-range threshold. No surviving cluster is an empty Vec.
///
/// # Example
/// ```
/// use clusterperm::{find_clusters, ClusterConfig};
///
/// let p = [0.9, 0.9, 0.01, 0.9, 0.01, 0.9];
/// let t = [0.1, 0.2, 3.0, 0.3, 4.0, 0.1];
///
/// let clusters = find_clusters(&p, &t, &ClusterConfig::default())?;
/// assert_eq!(clusters.len(), 2);
///
/// let merged = find_clusters(&p, &t, &ClusterConfig { merge_margin: 1, ..Default::default() })?;
/// assert_eq!((merged[0].onset, merged[0].offset), (2, 4));
/// # Ok::<(), clusterperm::ClusterPermError>(())
/// ```
pub fn find_clusters(p: &[f64], t: &[f64], config: &ClusterConfig) -> Result<Vec<Cluster>> {
    config.validate()?;
    if p.len() != t.len() {
        return Err(ClusterPermError::frames("cluster detection", p.len(), t.len()));
    }

    let raw = scan_boundaries(p, config.threshold);
    let merged = merge_spans(&raw, config.merge_margin);
    let kept = filter_spans(&merged, config.min_cluster_size);

    tracing::debug!(
        "cluster scan over {} frames: {} raw, {} after merge, {} kept",
        p.len(),
        raw.len(),
        merged.len(),
        kept.len()
    );

    Ok(kept.into_iter().map(|s| Cluster::from_span(s, t)).collect())
}

/// Detect clusters in a [`StatSeries`]
pub fn set_clusters(stats: &StatSeries, config: &ClusterConfig) -> Result<Vec<Cluster>> {
    find_clusters(&stats.p, &stats.t, config)
}

/// Most extreme cluster statistic for the given tail
///
/// `Greater` takes the largest value, `Less` the smallest, `TwoSided` the
/// value with the largest magnitude (sign kept). `None` when there are no
/// clusters or all statistics are NaN.
pub fn extreme_statistic(clusters: &[Cluster], kind: ClusterStatistic, tail: Tail) -> Option<f64> {
    let values = clusters
        .iter()
        .map(|c| c.statistic(kind))
        .filter(|v| !v.is_nan());

    match tail {
        Tail::Greater => values.reduce(f64::max),
        Tail::Less => values.reduce(f64::min),
        Tail::TwoSided => values.reduce(|a, b| if b.abs() > a.abs() { b } else { a }),
    }
}
