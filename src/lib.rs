//! Clusterperm - cluster-based permutation testing for repeated-measures time series
//!
//! Tests whether two conditions (or one condition against a population mean)
//! differ over time while controlling the family-wise error across
//! timepoints:
//!
//! 1. a t-test per timepoint across subjects ([`serial_ttest`])
//! 2. contiguous significant timepoints grouped into clusters ([`set_clusters`])
//! 3. a null distribution of the extreme cluster statistic built by
//!    relabeling subjects ([`paired_random_assign`], [`random_assign`])
//! 4. an empirical p-value per observed cluster ([`p_value`])
//!
//! [`ClusterPermutationTest`] runs all four steps.
//!
//! # Example
//! ```
//! use clusterperm::{serial_ttest, set_clusters, ClusterConfig, Comparand, Design, TestOptions, TimeSeriesMatrix};
//!
//! let cond1 = TimeSeriesMatrix::from_frames(vec![
//!     vec![1.0, 2.0, 3.0],
//!     vec![1.0, 2.0, 3.0],
//!     vec![1.0, 2.0, 3.0],
//! ])?;
//! let cond2 = TimeSeriesMatrix::from_frames(vec![
//!     vec![1.1, 1.9, 3.0],
//!     vec![6.0, 7.1, 8.0],
//!     vec![1.0, 2.1, 2.9],
//! ])?;
//!
//! let stats = serial_ttest(&cond1, Comparand::Condition(&cond2), Design::Paired, &TestOptions::default())?;
//! let clusters = set_clusters(&stats, &ClusterConfig::default())?;
//! assert_eq!(clusters.len(), 1);
//! assert_eq!((clusters[0].onset, clusters[0].offset), (1, 1));
//! # Ok::<(), clusterperm::ClusterPermError>(())
//! ```

pub mod cluster;
pub mod config;
pub mod descriptive;
pub mod error;
mod float_serde;
pub mod inference;
pub mod matrix;
pub mod permutation;
pub mod pvalue;
pub mod ttest;

pub use cluster::{
    extreme_statistic, find_clusters, set_clusters, Cluster, ClusterConfig, ClusterStatistic, Span,
};
pub use config::{AnalysisConfig, PermutationConfig};
pub use error::{ClusterPermError, Result};
pub use inference::{ClusterPermutationTest, ClusterResult, ClusterTestResult};
pub use matrix::TimeSeriesMatrix;
pub use permutation::{paired_random_assign, permutation_rng, random_assign, sign_flip_assign};
pub use pvalue::{p_value, p_value_with, percentile_of_score, PercentileKind};
pub use ttest::{serial_ttest, Comparand, Design, NanPolicy, StatSeries, Tail, TestOptions};
