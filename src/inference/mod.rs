// Cluster-based permutation test
//
// Composes the primitives into the full procedure:
//   1. observed StatSeries + clusters
//   2. per permutation: relabel subjects, retest, keep the extreme cluster
//      statistic (0.0 when nothing survives)
//   3. score each observed cluster against that null distribution
//
// Permutation i draws from permutation_rng(seed, i), so results are identical
// whether the permutations run on one thread or on a rayon pool.

mod report;

pub use report::{ClusterResult, ClusterTestResult};

use crate::cluster::{extreme_statistic, set_clusters, Cluster, ClusterConfig};
use crate::config::{AnalysisConfig, PermutationConfig};
use crate::error::{ClusterPermError, Result};
use crate::matrix::TimeSeriesMatrix;
use crate::permutation::{paired_random_assign, permutation_rng, random_assign, sign_flip_assign};
use crate::pvalue::p_value;
use crate::ttest::{serial_ttest, Comparand, Design, StatSeries, TestOptions};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Below this many permutations the null distribution is too coarse to
/// resolve p = 0.01
const MIN_RECOMMENDED_PERMUTATIONS: usize = 100;

/// Configured cluster permutation test
///
/// # Example
/// ```
/// use clusterperm::{
///     ClusterConfig, ClusterPermutationTest, Comparand, Design, PermutationConfig,
///     TestOptions, TimeSeriesMatrix,
/// };
///
/// let cond1 = TimeSeriesMatrix::from_fn(8, 6, |f, s| (s as f64) * 0.3 + (f as f64) * 0.1);
/// let cond2 = TimeSeriesMatrix::from_fn(8, 6, |f, s| {
///     let effect = if (2..6).contains(&f) { 2.0 + 0.1 * s as f64 } else { 0.0 };
///     (s as f64) * 0.3 + (f as f64) * 0.1 + effect
/// });
///
/// let test = ClusterPermutationTest::new(
///     Design::Paired,
///     TestOptions::default(),
///     ClusterConfig::default(),
///     PermutationConfig { n_permutations: 200, seed: 1, ..Default::default() },
/// );
/// let result = test.run(&cond1, Comparand::Condition(&cond2))?;
/// assert_eq!(result.clusters.len(), 1);
/// assert_eq!(result.null_distribution.len(), 200);
/// # Ok::<(), clusterperm::ClusterPermError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ClusterPermutationTest {
    design: Design,
    options: TestOptions,
    cluster: ClusterConfig,
    permutation: PermutationConfig,
}

impl ClusterPermutationTest {
    pub fn new(
        design: Design,
        options: TestOptions,
        cluster: ClusterConfig,
        permutation: PermutationConfig,
    ) -> Self {
        Self {
            design,
            options,
            cluster,
            permutation,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            config.design,
            config.test,
            config.cluster.clone(),
            config.permutation.clone(),
        )
    }

    pub fn design(&self) -> Design {
        self.design
    }

    /// Observed statistics and clusters for one dataset
    fn observe(
        &self,
        cond1: &TimeSeriesMatrix,
        comparand: Comparand<'_>,
    ) -> Result<(StatSeries, Vec<Cluster>)> {
        let stats = serial_ttest(cond1, comparand, self.design, &self.options)?;
        let clusters = set_clusters(&stats, &self.cluster)?;
        Ok((stats, clusters))
    }

    /// Extreme cluster statistic of permutation `index`
    fn permuted_statistic(
        &self,
        cond1: &TimeSeriesMatrix,
        comparand: Comparand<'_>,
        index: usize,
    ) -> Result<f64> {
        let mut rng = permutation_rng(self.permutation.seed, index as u64);

        let (_, clusters) = match (self.design, comparand) {
            (Design::Paired, Comparand::Condition(cond2)) => {
                let (pseudo1, pseudo2) = paired_random_assign(cond1, cond2, &mut rng)?;
                self.observe(&pseudo1, Comparand::Condition(&pseudo2))?
            }
            (Design::Independent, Comparand::Condition(cond2)) => {
                let (pseudo1, pseudo2) = random_assign(cond1, cond2, &mut rng)?;
                self.observe(&pseudo1, Comparand::Condition(&pseudo2))?
            }
            (Design::OneSample, Comparand::PopulationMean(popmean)) => {
                let pseudo = sign_flip_assign(cond1, popmean, &mut rng);
                self.observe(&pseudo, comparand)?
            }
            (Design::OneSample, _) => {
                return Err(ClusterPermError::ComparandMismatch {
                    design: "one-sample",
                    required: "a population mean",
                })
            }
            (design, _) => {
                return Err(ClusterPermError::ComparandMismatch {
                    design: design.name(),
                    required: "a second condition",
                })
            }
        };

        let extreme = extreme_statistic(
            &clusters,
            self.permutation.statistic,
            self.permutation.tail,
        )
        .unwrap_or(0.0);

        tracing::trace!("permutation {}: extreme cluster statistic {}", index, extreme);
        Ok(extreme)
    }

    /// Extreme cluster statistic of every permutation, in permutation order
    ///
    /// # Errors
    /// Any configuration or shape error; nothing is returned partially.
    pub fn null_distribution(
        &self,
        cond1: &TimeSeriesMatrix,
        comparand: Comparand<'_>,
    ) -> Result<Vec<f64>> {
        self.permutation.validate()?;
        self.cluster.validate()?;

        let n = self.permutation.n_permutations;
        if n < MIN_RECOMMENDED_PERMUTATIONS {
            tracing::warn!(
                "only {} permutations requested, null distribution will be coarse (recommended >= {})",
                n,
                MIN_RECOMMENDED_PERMUTATIONS
            );
        }

        #[cfg(feature = "parallel")]
        let null = (0..n)
            .into_par_iter()
            .map(|i| self.permuted_statistic(cond1, comparand, i))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let null = (0..n)
            .map(|i| self.permuted_statistic(cond1, comparand, i))
            .collect();

        null
    }

    /// Run the complete test
    ///
    /// # Errors
    /// `ShapeMismatch`, `ComparandMismatch` or `InvalidConfig`; checked on the
    /// observed data before any permutation runs.
    pub fn run(
        &self,
        cond1: &TimeSeriesMatrix,
        comparand: Comparand<'_>,
    ) -> Result<ClusterTestResult> {
        self.permutation.validate()?;

        tracing::debug!(
            "cluster permutation test: {} design, {} permutations, seed {}",
            self.design,
            self.permutation.n_permutations,
            self.permutation.seed
        );

        let (observed, clusters) = self.observe(cond1, comparand)?;
        let null_distribution = self.null_distribution(cond1, comparand)?;

        let clusters = clusters
            .into_iter()
            .map(|cluster| {
                let statistic = cluster.statistic(self.permutation.statistic);
                let p = p_value(&null_distribution, statistic, self.permutation.tail)?;
                Ok(ClusterResult {
                    cluster,
                    statistic,
                    p_value: p,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "cluster permutation test done: {} observed clusters",
            clusters.len()
        );

        Ok(ClusterTestResult {
            design: self.design,
            statistic: self.permutation.statistic,
            tail: self.permutation.tail,
            n_permutations: self.permutation.n_permutations,
            seed: self.permutation.seed,
            observed,
            clusters,
            null_distribution,
        })
    }
}

#[cfg(test)]
mod tests;
