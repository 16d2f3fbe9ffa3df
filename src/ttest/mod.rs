// Per-timepoint hypothesis testing for repeated-measures time series
//
// One Student t-test per frame, for paired, independent and one-sample
// designs. Produces a StatSeries (t, p, df per frame) that the cluster
// detector consumes.
//
// Implementation:
// - statrs Student-t CDF for tail-aware p-values
// - NaN-omitting descriptives from crate::descriptive
// - Pure functions: inputs are borrowed, never mutated

mod config;
mod series;
mod statistics;

pub use config::{Design, NanPolicy, Tail, TestOptions};
pub use series::{serial_ttest, Comparand, StatSeries};
pub use statistics::{t_pvalue, ttest_1samp, ttest_ind, ttest_rel, TTestResult};
