// Analysis configuration
//
// Bundles the design, per-timepoint test options, cluster detection and
// permutation parameters into one serde struct that callers can keep in a
// TOML file next to their data.

use crate::cluster::{ClusterConfig, ClusterStatistic};
use crate::error::{ClusterPermError, Result};
use crate::ttest::{Design, Tail, TestOptions};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Permutation run parameters
///
/// # Example
/// ```
/// use clusterperm::PermutationConfig;
///
/// let config = PermutationConfig::default();
/// assert_eq!(config.n_permutations, 1000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermutationConfig {
    /// Number of relabeled datasets in the null distribution
    ///
    /// Default: 1000 (smallest reportable p-value 0.001)
    pub n_permutations: usize,

    /// Base seed; permutation `i` uses a generator derived from `(seed, i)`
    pub seed: u64,

    /// Cluster descriptive compared against the null
    pub statistic: ClusterStatistic,

    /// Side of the null distribution the cluster p-values look at
    pub tail: Tail,
}

impl Default for PermutationConfig {
    fn default() -> Self {
        Self {
            n_permutations: 1000,
            seed: 0,
            statistic: ClusterStatistic::Sum,
            tail: Tail::TwoSided,
        }
    }
}

impl PermutationConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.n_permutations == 0 {
            return Err(ClusterPermError::InvalidConfig(
                "n_permutations must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete analysis setup
///
/// # Example TOML
/// ```toml
/// design = "paired"
///
/// [test]
/// tail = "two-sided"
/// nan_policy = "omit"
///
/// [cluster]
/// threshold = 0.05
/// merge_margin = 2
/// min_cluster_size = 3
///
/// [permutation]
/// n_permutations = 2000
/// seed = 42
/// statistic = "sum"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub design: Design,

    #[serde(default)]
    pub test: TestOptions,

    #[serde(default)]
    pub cluster: ClusterConfig,

    #[serde(default)]
    pub permutation: PermutationConfig,
}

impl AnalysisConfig {
    /// Defaults for the given design
    pub fn new(design: Design) -> Self {
        Self {
            design,
            test: TestOptions::default(),
            cluster: ClusterConfig::default(),
            permutation: PermutationConfig::default(),
        }
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse TOML analysis configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load, parse and validate a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read analysis config: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string(self).context("Failed to serialize analysis configuration")
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.cluster.validate()?;
        self.permutation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ttest::NanPolicy;
    use std::io::Write;

    #[test]
    fn test_default_permutation_config() {
        let config = PermutationConfig::default();
        assert_eq!(config.n_permutations, 1000);
        assert_eq!(config.seed, 0);
        assert_eq!(config.statistic, ClusterStatistic::Sum);
        assert_eq!(config.tail, Tail::TwoSided);
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_zero_permutations_rejected() {
        let mut config = PermutationConfig::default();
        config.n_permutations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_str_full() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            design = "independent"

            [test]
            tail = "greater"
            nan_policy = "propagate"
            equal_var = false

            [cluster]
            threshold = 0.01
            merge_margin = 2
            min_cluster_size = 3

            [permutation]
            n_permutations = 250
            seed = 42
            statistic = "max"
            tail = "greater"
            "#,
        )
        .unwrap();

        assert_eq!(config.design, Design::Independent);
        assert_eq!(config.test.tail, Tail::Greater);
        assert_eq!(config.test.nan_policy, NanPolicy::Propagate);
        assert!(!config.test.equal_var);
        assert_eq!(config.cluster.merge_margin, 2);
        assert_eq!(config.cluster.min_cluster_size, 3);
        assert_eq!(config.permutation.n_permutations, 250);
        assert_eq!(config.permutation.statistic, ClusterStatistic::Max);
    }

    #[test]
    fn test_from_toml_str_defaults_sections() {
        let config = AnalysisConfig::from_toml_str("design = \"paired\"").unwrap();
        assert_eq!(config, AnalysisConfig::new(Design::Paired));
    }

    #[test]
    fn test_from_toml_str_partial_section() {
        let config = AnalysisConfig::from_toml_str(
            "design = \"one-sample\"\n[cluster]\nthreshold = 0.1\n",
        )
        .unwrap();
        assert_eq!(config.cluster.threshold, 0.1);
        assert_eq!(config.cluster.merge_margin, 0);
    }

    #[test]
    fn test_from_toml_str_rejects_invalid_values() {
        let result = AnalysisConfig::from_toml_str(
            "design = \"paired\"\n[cluster]\nthreshold = 2.0\n",
        );
        assert!(result.is_err());

        let result = AnalysisConfig::from_toml_str("design = \"crossover\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AnalysisConfig::new(Design::Independent);
        config.permutation.seed = 7;
        let text = config.to_toml_string().unwrap();
        assert_eq!(AnalysisConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "design = \"paired\"\n[permutation]\nseed = 9").unwrap();

        let config = AnalysisConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.permutation.seed, 9);

        let missing = AnalysisConfig::from_toml_file("/nonexistent/analysis.toml");
        assert!(missing.is_err());
    }
}
