// Result types of a cluster permutation test
//
// Serializable so a run can be archived next to its configuration. NaN
// (undefined frames) is written as JSON null and ±inf (zero-variance
// effects) as "inf"/"-inf"; both read back unchanged.

use crate::cluster::{Cluster, ClusterStatistic};
use crate::ttest::{Design, StatSeries, Tail};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Observed cluster scored against the null distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    pub cluster: Cluster,

    /// Cluster-level statistic of the configured kind
    #[serde(with = "crate::float_serde")]
    pub statistic: f64,

    /// Empirical p-value, rounded to 3 decimals
    pub p_value: f64,
}

impl ClusterResult {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value <= alpha
    }
}

/// Complete outcome of [`super::ClusterPermutationTest::run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterTestResult {
    pub design: Design,
    pub statistic: ClusterStatistic,
    pub tail: Tail,
    pub n_permutations: usize,
    pub seed: u64,

    /// Per-frame statistics of the unpermuted data
    pub observed: StatSeries,

    /// Observed clusters in temporal order
    pub clusters: Vec<ClusterResult>,

    /// Extreme cluster statistic of each permutation, in permutation order
    #[serde(with = "crate::float_serde::vec")]
    pub null_distribution: Vec<f64>,
}

impl ClusterTestResult {
    /// Clusters with `p_value <= alpha`
    pub fn significant(&self, alpha: f64) -> Vec<&ClusterResult> {
        self.clusters
            .iter()
            .filter(|c| c.is_significant(alpha))
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize cluster test result")
    }

    /// Human-readable summary, clusters marked against `alpha`
    pub fn to_report_string(&self, alpha: f64) -> String {
        let mut report = String::new();

        let n_significant = self.significant(alpha).len();
        if n_significant > 0 {
            report.push_str(&format!(
                "SIGNIFICANT CLUSTERS: {} of {} (alpha = {})\n\n",
                n_significant,
                self.clusters.len(),
                alpha
            ));
        } else {
            report.push_str(&format!(
                "NO SIGNIFICANT CLUSTERS ({} observed, alpha = {})\n\n",
                self.clusters.len(),
                alpha
            ));
        }

        report.push_str(&format!("Design: {}\n", self.design));
        report.push_str(&format!(
            "Frames: {} ({} undefined)\n",
            self.observed.len(),
            self.observed.undefined_frames().len()
        ));
        report.push_str(&format!(
            "Permutations: {} (seed {})\n",
            self.n_permutations, self.seed
        ));

        if !self.clusters.is_empty() {
            report.push_str(&format!("\nClusters ({:?} statistic):\n", self.statistic));
            for result in &self.clusters {
                let c = &result.cluster;
                report.push_str(&format!(
                    "  {} [{}, {}] frames={} statistic={:.3} p={:.3}\n",
                    if result.is_significant(alpha) { "*" } else { " " },
                    c.onset,
                    c.offset,
                    c.frames(),
                    result.statistic,
                    result.p_value
                ));
            }
        }

        report
    }
}
