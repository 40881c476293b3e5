// Statistical tests for two-sample experiment analysis
//
// This module implements the four tests the experiment pipeline needs:
// - Shapiro-Wilk (normality, per group)
// - Levene (homogeneity of variance across groups)
// - Independent two-sample t-test (parametric comparison)
// - Mann-Whitney U (non-parametric comparison)
//
// statrs supplies the distribution CDFs (normal, Student's t,
// Fisher-Snedecor); the test statistics themselves are computed here since
// no crate in the stack ships Shapiro-Wilk or Levene.

mod descriptive;
mod levene;
mod mann_whitney;
mod shapiro;
mod ttest;

pub use descriptive::{mean, median, quantile, sample_std, sample_variance};
pub use levene::levene;
pub use mann_whitney::mann_whitney_u;
pub use shapiro::shapiro_wilk;
pub use ttest::ttest_ind;

use serde::Serialize;
use thiserror::Error;

/// Errors from statistical test input validation
///
/// All of these are fatal to the pipeline: there is no fallback test when a
/// sample is too small or degenerate for the selected procedure.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("{test} requires at least {needed} observations, got {got}")]
    TooFewObservations {
        test: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("Shapiro-Wilk supports at most 5000 observations, got {0}")]
    SampleTooLarge(usize),

    #[error("{test} is undefined for zero-variance input")]
    ZeroVariance { test: &'static str },

    #[error("distribution setup failed: {0}")]
    Distribution(String),
}

/// Outcome of a single statistical test: the test statistic and its
/// two-sided p-value. Consumed immediately for an alpha-threshold decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestResult {
    pub statistic: f64,
    pub p_value: f64,
}

impl TestResult {
    /// True when the null hypothesis survives at the given significance level
    pub fn retains_null(&self, alpha: f64) -> bool {
        self.p_value > alpha
    }
}
