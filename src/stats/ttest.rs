// Independent two-sample t-test, pooled-variance (Student) or
// unequal-variance (Welch) according to the caller's homogeneity verdict.
// Two-sided p-value from Student's t distribution.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::stats::descriptive::{mean, sample_variance};
use crate::stats::{StatsError, TestResult};

/// Run an independent two-sample t-test.
///
/// `equal_var = true` pools the variances (classic Student's test, df =
/// n1 + n2 - 2); `equal_var = false` uses Welch's test with the
/// Welch-Satterthwaite degrees of freedom.
pub fn ttest_ind(first: &[f64], second: &[f64], equal_var: bool) -> Result<TestResult, StatsError> {
    for sample in [first, second] {
        if sample.len() < 2 {
            return Err(StatsError::TooFewObservations {
                test: "t-test",
                needed: 2,
                got: sample.len(),
            });
        }
    }

    let n1 = first.len() as f64;
    let n2 = second.len() as f64;
    let m1 = mean(first);
    let m2 = mean(second);
    let v1 = sample_variance(first);
    let v2 = sample_variance(second);

    let (statistic, df) = if equal_var {
        let df = n1 + n2 - 2.0;
        let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
        let se = (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
        if se == 0.0 {
            return Err(StatsError::ZeroVariance { test: "t-test" });
        }
        ((m1 - m2) / se, df)
    } else {
        let se_sq = v1 / n1 + v2 / n2;
        if se_sq == 0.0 {
            return Err(StatsError::ZeroVariance { test: "t-test" });
        }
        let df = se_sq * se_sq
            / ((v1 / n1) * (v1 / n1) / (n1 - 1.0) + (v2 / n2) * (v2 / n2) / (n2 - 1.0));
        ((m1 - m2) / se_sq.sqrt(), df)
    };

    let t_dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p_value = (2.0 * (1.0 - t_dist.cdf(statistic.abs()))).clamp(0.0, 1.0);

    Ok(TestResult { statistic, p_value })
}
