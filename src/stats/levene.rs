// Levene test for homogeneity of variance between two samples.
//
// Uses median centering (the Brown-Forsythe variant), which is the default
// in the reference statistics stacks and more robust to non-normality than
// mean centering. The W statistic follows F(k - 1, N - k) under H0.

use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use crate::stats::descriptive::{mean, median};
use crate::stats::{StatsError, TestResult};

/// Run Levene's test on two samples.
///
/// H0: the samples have equal variance. p > alpha keeps the homogeneity
/// assumption.
pub fn levene(first: &[f64], second: &[f64]) -> Result<TestResult, StatsError> {
    for sample in [first, second] {
        if sample.len() < 2 {
            return Err(StatsError::TooFewObservations {
                test: "Levene",
                needed: 2,
                got: sample.len(),
            });
        }
    }

    let n1 = first.len() as f64;
    let n2 = second.len() as f64;
    let n_total = n1 + n2;
    let k = 2.0;

    // Absolute deviations from each sample's median
    let center1 = median(first);
    let center2 = median(second);
    let z1: Vec<f64> = first.iter().map(|v| (v - center1).abs()).collect();
    let z2: Vec<f64> = second.iter().map(|v| (v - center2).abs()).collect();

    let zbar1 = mean(&z1);
    let zbar2 = mean(&z2);
    let zbar = (n1 * zbar1 + n2 * zbar2) / n_total;

    let between = n1 * (zbar1 - zbar) * (zbar1 - zbar) + n2 * (zbar2 - zbar) * (zbar2 - zbar);
    let within: f64 = z1.iter().map(|z| (z - zbar1) * (z - zbar1)).sum::<f64>()
        + z2.iter().map(|z| (z - zbar2) * (z - zbar2)).sum::<f64>();

    if within == 0.0 {
        return Err(StatsError::ZeroVariance { test: "Levene" });
    }

    let statistic = (n_total - k) / (k - 1.0) * between / within;

    let f_dist = FisherSnedecor::new(k - 1.0, n_total - k)
        .map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p_value = (1.0 - f_dist.cdf(statistic)).clamp(0.0, 1.0);

    Ok(TestResult { statistic, p_value })
}
