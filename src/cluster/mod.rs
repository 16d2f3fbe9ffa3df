// Temporal cluster detection over per-timepoint test results
//
// Scans p-values against a threshold, merges runs separated by short gaps,
// drops runs that are too short, and summarizes t over each surviving run.
// The cluster-level statistic (mass, peak, size) of the most extreme cluster
// is what a permutation test compares against its null distribution.

mod config;
mod detect;

pub use config::ClusterConfig;
pub use detect::{
    extreme_statistic, filter_spans, find_clusters, merge_spans, scan_boundaries, set_clusters,
    Cluster, ClusterStatistic, Span,
};
