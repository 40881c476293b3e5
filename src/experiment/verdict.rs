// Typed decision pipeline for the A/B comparison.
//
// Normality (Shapiro-Wilk per arm) gates the test family; homogeneity
// (Levene) only sets the t-test's variance assumption. The final decision is
// the comparison p-value against alpha. Each stage's outcome is a typed enum
// so callers and tests never have to parse printed text.

use serde::Serialize;

use crate::dataset::{CombinedFrame, Group};
use crate::experiment::ExperimentConfig;
use crate::stats::{levene, mann_whitney_u, shapiro_wilk, ttest_ind, StatsError, TestResult};

/// Normality verdict for one arm's purchase distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NormalityVerdict {
    Normal,
    NonNormal,
}

impl NormalityVerdict {
    fn from_result(result: &TestResult, alpha: f64) -> Self {
        if result.retains_null(alpha) {
            NormalityVerdict::Normal
        } else {
            NormalityVerdict::NonNormal
        }
    }
}

/// Variance homogeneity verdict across the two arms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HomogeneityVerdict {
    Homogeneous,
    Heterogeneous,
}

/// Which comparison test the assumption checks selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonTest {
    /// Independent two-sample t-test; `equal_var` mirrors the Levene verdict
    TTest { equal_var: bool },
    /// Non-parametric fallback when either arm fails the normality check
    MannWhitneyU,
}

impl ComparisonTest {
    pub fn name(&self) -> &'static str {
        match self {
            ComparisonTest::TTest { .. } => "Independent two-sample t-test",
            ComparisonTest::MannWhitneyU => "Mann-Whitney U test",
        }
    }
}

/// Final call on the null hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    /// p > alpha: the observed difference is plausibly chance
    FailToRejectH0,
    /// p <= alpha: statistically significant difference between arms
    RejectH0,
}

/// Complete assessment of one experiment: every test result and verdict the
/// pipeline produced, in execution order
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentAssessment {
    pub alpha: f64,
    pub control_normality: TestResult,
    pub control_verdict: NormalityVerdict,
    pub test_normality: TestResult,
    pub test_verdict: NormalityVerdict,
    pub homogeneity: TestResult,
    pub homogeneity_verdict: HomogeneityVerdict,
    pub comparison: ComparisonTest,
    pub comparison_result: TestResult,
    pub decision: Decision,
}

/// Run the assumption checks and the selected comparison on the combined
/// dataset's purchase metric.
pub fn assess_experiment(
    combined: &CombinedFrame,
    config: &ExperimentConfig,
) -> Result<ExperimentAssessment, StatsError> {
    let alpha = config.alpha;
    let control = combined.purchases(Group::Control);
    let test = combined.purchases(Group::Test);

    // Step 1: normality, always both arms
    let control_normality = shapiro_wilk(&control)?;
    let control_verdict = NormalityVerdict::from_result(&control_normality, alpha);
    let test_normality = shapiro_wilk(&test)?;
    let test_verdict = NormalityVerdict::from_result(&test_normality, alpha);

    // Step 2: homogeneity, always computed and reported even when the
    // non-parametric branch won't consult it
    let homogeneity = levene(&control, &test)?;
    let homogeneity_verdict = if homogeneity.retains_null(alpha) {
        HomogeneityVerdict::Homogeneous
    } else {
        HomogeneityVerdict::Heterogeneous
    };

    // Step 3: normality alone picks the family; homogeneity only sets the
    // t-test's variance assumption
    let both_normal =
        control_verdict == NormalityVerdict::Normal && test_verdict == NormalityVerdict::Normal;
    let (comparison, comparison_result) = if both_normal {
        let equal_var = homogeneity_verdict == HomogeneityVerdict::Homogeneous;
        (
            ComparisonTest::TTest { equal_var },
            ttest_ind(&control, &test, equal_var)?,
        )
    } else {
        (ComparisonTest::MannWhitneyU, mann_whitney_u(&control, &test)?)
    };
    tracing::debug!(test = comparison.name(), p = comparison_result.p_value, "comparison done");

    // Step 4: interpretation
    let decision = if comparison_result.retains_null(alpha) {
        Decision::FailToRejectH0
    } else {
        Decision::RejectH0
    };

    Ok(ExperimentAssessment {
        alpha,
        control_normality,
        control_verdict,
        test_normality,
        test_verdict,
        homogeneity,
        homogeneity_verdict,
        comparison,
        comparison_result,
        decision,
    })
}

impl ExperimentAssessment {
    /// Human-readable verdict report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!(
            "{:-^70}\n",
            " A/B HYPOTHESIS TEST (Purchase) "
        ));
        report.push_str(&format!(
            "Significance level: {} ({}% confidence)\n\n",
            self.alpha,
            (1.0 - self.alpha) * 100.0
        ));

        for (group, result, verdict) in [
            ("Control", &self.control_normality, self.control_verdict),
            ("Test", &self.test_normality, self.test_verdict),
        ] {
            let text = match verdict {
                NormalityVerdict::Normal => "looks normal",
                NormalityVerdict::NonNormal => "does NOT look normal",
            };
            report.push_str(&format!(
                "Shapiro-Wilk [{}]: W = {:.4}, p = {:.4} -> sample {}\n",
                group, result.statistic, result.p_value, text
            ));
        }

        let homogeneity_text = match self.homogeneity_verdict {
            HomogeneityVerdict::Homogeneous => "variances are homogeneous",
            HomogeneityVerdict::Heterogeneous => "variances are NOT homogeneous",
        };
        report.push_str(&format!(
            "Levene: W = {:.4}, p = {:.4} -> {}\n\n",
            self.homogeneity.statistic, self.homogeneity.p_value, homogeneity_text
        ));

        report.push_str(&format!("Selected test: {}", self.comparison.name()));
        if let ComparisonTest::TTest { equal_var } = self.comparison {
            report.push_str(if equal_var {
                " (pooled variance)"
            } else {
                " (Welch, unequal variance)"
            });
        }
        report.push_str(&format!(
            "\nstatistic = {:.4}, p = {:.4}\n\n",
            self.comparison_result.statistic, self.comparison_result.p_value
        ));

        match self.decision {
            Decision::FailToRejectH0 => {
                report.push_str(
                    "Fail to reject H0: no statistically significant difference between \
                     the group means; the observed gap is plausibly chance.\n",
                );
            }
            Decision::RejectH0 => {
                report.push_str(
                    "Reject H0: a statistically significant difference exists between \
                     the group means.\n",
                );
            }
        }
        report
    }
}
