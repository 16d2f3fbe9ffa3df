// Options for per-timepoint hypothesis testing
//
// Plain serde types with Defaults, so the same options can be embedded in
// an AnalysisConfig loaded from TOML.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Experimental design of the comparison
///
/// Determines how the t-test pairs observations and how permutations
/// reassign subjects between conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Design {
    /// Same subjects measured in both conditions
    Paired,
    /// Each subject belongs to exactly one condition
    Independent,
    /// One condition against a fixed population mean
    OneSample,
}

impl Design {
    pub fn name(self) -> &'static str {
        match self {
            Design::Paired => "paired",
            Design::Independent => "independent",
            Design::OneSample => "one-sample",
        }
    }
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Side of the distribution a test looks at
///
/// `Greater` tests condition 1 > condition 2 (or > population mean).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tail {
    Greater,
    Less,
    #[default]
    TwoSided,
}

/// Treatment of missing (NaN) observations at a timepoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NanPolicy {
    /// Drop NaN subjects from that timepoint's test
    #[default]
    Omit,
    /// Any NaN makes that timepoint's statistic and p-value NaN
    Propagate,
}

/// Per-timepoint test options
///
/// # Example
/// ```
/// use clusterperm::{NanPolicy, Tail, TestOptions};
///
/// let options = TestOptions::default();
/// assert_eq!(options.tail, Tail::TwoSided);
/// assert_eq!(options.nan_policy, NanPolicy::Omit);
/// assert!(options.equal_var);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestOptions {
    pub tail: Tail,
    pub nan_policy: NanPolicy,

    /// Independent design only: pooled-variance Student test when true,
    /// Welch's unequal-variance test when false
    pub equal_var: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            tail: Tail::TwoSided,
            nan_policy: NanPolicy::Omit,
            equal_var: true,
        }
    }
}

impl TestOptions {
    pub fn with_tail(mut self, tail: Tail) -> Self {
        self.tail = tail;
        self
    }

    pub fn with_nan_policy(mut self, nan_policy: NanPolicy) -> Self {
        self.nan_policy = nan_policy;
        self
    }

    pub fn welch(mut self) -> Self {
        self.equal_var = false;
        self
    }
}
