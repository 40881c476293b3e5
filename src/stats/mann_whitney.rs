// Mann-Whitney U rank-sum test, the non-parametric fallback when a group
// fails the normality check.
//
// Reports U for the first sample and a two-sided p-value from the normal
// approximation with tie correction and continuity correction, matching the
// asymptotic method of the reference statistics stacks.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::stats::{StatsError, TestResult};

/// Assign ranks over the pooled sample, averaging ranks within tie groups.
/// Input pairs are (value, sample_index) sorted ascending by value; output
/// pairs are (rank, sample_index) in the same order.
fn assign_ranks_with_ties(sorted: &[(f64, usize)]) -> Vec<(f64, usize)> {
    let mut ranks = Vec::with_capacity(sorted.len());
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1].0 == sorted[i].0 {
            j += 1;
        }
        // Ranks are 1-based; ties share the average of their rank span
        let avg_rank = (i + 1 + j + 1) as f64 / 2.0;
        for item in &sorted[i..=j] {
            ranks.push((avg_rank, item.1));
        }
        i = j + 1;
    }
    ranks
}

/// Sum of (t^3 - t) over tie groups, for the variance correction
fn tie_correction_term(sorted: &[(f64, usize)]) -> f64 {
    let mut total = 0.0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1].0 == sorted[i].0 {
            j += 1;
        }
        let t = (j - i + 1) as f64;
        total += t * t * t - t;
        i = j + 1;
    }
    total
}

/// Run the Mann-Whitney U test on two samples.
///
/// H0: the two distributions are equal. The statistic is U1 (first sample);
/// the p-value is two-sided.
pub fn mann_whitney_u(first: &[f64], second: &[f64]) -> Result<TestResult, StatsError> {
    for sample in [first, second] {
        if sample.len() < 2 {
            return Err(StatsError::TooFewObservations {
                test: "Mann-Whitney U",
                needed: 2,
                got: sample.len(),
            });
        }
    }

    let n1 = first.len() as f64;
    let n2 = second.len() as f64;
    let n = n1 + n2;

    let mut pooled: Vec<(f64, usize)> = first
        .iter()
        .map(|&v| (v, 0))
        .chain(second.iter().map(|&v| (v, 1)))
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let ranks = assign_ranks_with_ties(&pooled);
    let rank_sum_first: f64 = ranks
        .iter()
        .filter(|(_, sample)| *sample == 0)
        .map(|(rank, _)| rank)
        .sum();

    let u1 = rank_sum_first - n1 * (n1 + 1.0) / 2.0;

    let mu = n1 * n2 / 2.0;
    let tie_term = tie_correction_term(&pooled);
    let sigma_sq = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if sigma_sq <= 0.0 {
        // Every pooled value tied: no ordering information at all
        return Err(StatsError::ZeroVariance {
            test: "Mann-Whitney U",
        });
    }

    // Continuity correction shrinks |U1 - mu| by 0.5 before standardizing.
    // A perfectly balanced U stays at zero (signum(0.0) is 1.0, which would
    // otherwise push it to -0.5).
    let diff = u1 - mu;
    let corrected = if diff == 0.0 {
        0.0
    } else {
        diff - 0.5 * diff.signum()
    };
    let z = corrected / sigma_sq.sqrt();

    let standard_normal =
        Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p_value = (2.0 * (1.0 - standard_normal.cdf(z.abs()))).clamp(0.0, 1.0);

    Ok(TestResult {
        statistic: u1,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_ranks_no_ties() {
        let sorted = vec![(1.0, 0), (2.0, 1), (3.0, 0), (4.0, 1)];
        let ranks = assign_ranks_with_ties(&sorted);
        assert_eq!(ranks.len(), 4);
        assert!((ranks[0].0 - 1.0).abs() < 1e-12);
        assert!((ranks[3].0 - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_assign_ranks_averages_tie_groups() {
        let sorted = vec![(1.0, 0), (1.0, 1), (3.0, 0), (3.0, 1)];
        let ranks = assign_ranks_with_ties(&sorted);
        assert!((ranks[0].0 - 1.5).abs() < 1e-12);
        assert!((ranks[1].0 - 1.5).abs() < 1e-12);
        assert!((ranks[2].0 - 3.5).abs() < 1e-12);
        assert!((ranks[3].0 - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_assign_ranks_preserves_sample_index() {
        let sorted = vec![(1.0, 0), (2.0, 1), (3.0, 0)];
        let ranks = assign_ranks_with_ties(&sorted);
        assert_eq!(ranks[0].1, 0);
        assert_eq!(ranks[1].1, 1);
        assert_eq!(ranks[2].1, 0);
    }

    #[test]
    fn test_u_statistic_fully_separated() {
        // Every first value below every second value: U1 = 0
        let a = [1.0, 2.0, 3.0];
        let b = [10.0, 11.0, 12.0];
        let result = mann_whitney_u(&a, &b).unwrap();
        assert!(result.statistic.abs() < 1e-12);
    }

    #[test]
    fn test_u_statistic_symmetry() {
        // U1 + U2 = n1 * n2
        let a = [5.0, 7.0, 1.0, 9.0];
        let b = [2.0, 8.0, 3.0, 6.0, 4.0];
        let forward = mann_whitney_u(&a, &b).unwrap();
        let backward = mann_whitney_u(&b, &a).unwrap();
        let n1n2 = (a.len() * b.len()) as f64;
        assert!((forward.statistic + backward.statistic - n1n2).abs() < 1e-12);
        assert!((forward.p_value - backward.p_value).abs() < 1e-12);
    }

    #[test]
    fn test_balanced_u_gives_p_exactly_one() {
        // Interleaved samples: R1 = 1 + 4 = 5, U1 = 2 = n1*n2/2, so the
        // standardized statistic must be exactly zero, not -0.5
        let a = [1.0, 4.0];
        let b = [2.0, 3.0];
        let result = mann_whitney_u(&a, &b).unwrap();
        assert_eq!(result.statistic, 2.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_identical_distributions_not_significant() {
        let a: Vec<f64> = (0..15).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..15).map(|i| i as f64 + 0.5).collect();
        let result = mann_whitney_u(&a, &b).unwrap();
        assert!(result.p_value > 0.05);
    }

    #[test]
    fn test_separated_distributions_significant() {
        let a: Vec<f64> = (0..15).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..15).map(|i| i as f64 + 100.0).collect();
        let result = mann_whitney_u(&a, &b).unwrap();
        assert!(result.p_value < 0.001);
    }

    #[test]
    fn test_all_values_tied_is_error() {
        assert!(matches!(
            mann_whitney_u(&[4.0, 4.0, 4.0], &[4.0, 4.0]),
            Err(StatsError::ZeroVariance { .. })
        ));
    }

    #[test]
    fn test_too_few_observations() {
        assert!(matches!(
            mann_whitney_u(&[1.0], &[2.0, 3.0]),
            Err(StatsError::TooFewObservations { .. })
        ));
    }
}
