// Configuration for temporal cluster detection
//
// threshold: p <= threshold marks a frame significant
// merge_margin: max non-significant frames bridged between two clusters
// min_cluster_size: clusters with offset - onset below this are dropped

use crate::error::{ClusterPermError, Result};
use serde::{Deserialize, Serialize};

/// Cluster detection parameters
///
/// # Example
/// ```
/// use clusterperm::ClusterConfig;
///
/// let config = ClusterConfig::default();
/// assert_eq!(config.threshold, 0.05);
/// assert_eq!(config.merge_margin, 0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Significance threshold applied to each frame's p-value
    ///
    /// - 0.05 (default): conventional cluster-forming threshold
    /// - 0.01: fewer, tighter clusters
    pub threshold: f64,

    /// Largest gap (in non-significant frames) merged into one cluster
    ///
    /// Default: 0 (never merge)
    pub merge_margin: usize,

    /// Minimum `offset - onset` for a cluster to be kept
    ///
    /// Default: 0 (keep single-frame clusters)
    pub min_cluster_size: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.05,
            merge_margin: 0,
            min_cluster_size: 0,
        }
    }
}

impl ClusterConfig {
    /// Stricter threshold, no single-frame clusters
    pub fn strict() -> Self {
        Self {
            threshold: 0.01,
            merge_margin: 0,
            min_cluster_size: 2,
        }
    }

    /// Looser threshold, bridges one-frame dropouts
    pub fn permissive() -> Self {
        Self {
            threshold: 0.10,
            merge_margin: 1,
            min_cluster_size: 0,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ClusterPermError::InvalidConfig(format!(
                "threshold must be in [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
