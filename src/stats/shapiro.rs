// Shapiro-Wilk normality test, Royston's AS R94 algorithm (Applied
// Statistics 44(4), 1995). Same algorithm the reference statistics stacks
// implement, so verdicts agree with them.
//
// Valid for 3 <= n <= 5000. The W statistic is the squared correlation
// between the ordered sample and the expected normal order statistics;
// the p-value comes from Royston's normalizing transformation of W.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::stats::descriptive::mean;
use crate::stats::{StatsError, TestResult};

const MAX_OBSERVATIONS: usize = 5000;

/// Polynomial evaluation with coefficients in ascending-power order
fn poly(coeffs: &[f64], x: f64) -> f64 {
    coeffs
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc.mul_add(x, c))
}

/// Run the Shapiro-Wilk normality test on one sample.
///
/// Returns the W statistic and the upper-tail p-value. Small p-values reject
/// normality; p > alpha means the sample is consistent with a normal
/// distribution.
pub fn shapiro_wilk(sample: &[f64]) -> Result<TestResult, StatsError> {
    let n = sample.len();
    if n < 3 {
        return Err(StatsError::TooFewObservations {
            test: "Shapiro-Wilk",
            needed: 3,
            got: n,
        });
    }
    if n > MAX_OBSERVATIONS {
        return Err(StatsError::SampleTooLarge(n));
    }

    let mut x = sample.to_vec();
    x.sort_by(|a, b| a.total_cmp(b));
    if x[n - 1] - x[0] == 0.0 {
        return Err(StatsError::ZeroVariance {
            test: "Shapiro-Wilk",
        });
    }

    let standard_normal =
        Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;

    // Expected normal order statistics (Blom-style plotting positions)
    let nf = n as f64;
    let m: Vec<f64> = (1..=n)
        .map(|i| standard_normal.inverse_cdf((i as f64 - 0.375) / (nf + 0.25)))
        .collect();
    let m_sq_sum: f64 = m.iter().map(|v| v * v).sum();
    let u = 1.0 / nf.sqrt();

    // Normalized weights, with Royston's polynomial corrections to the one
    // (n <= 5) or two (n > 5) extreme coefficients
    let mut a = vec![0.0; n];
    if n > 5 {
        let a_n = poly(&[0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056], u)
            + m[n - 1] / m_sq_sum.sqrt();
        let a_n1 = poly(&[0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633], u)
            + m[n - 2] / m_sq_sum.sqrt();
        let phi = (m_sq_sum - 2.0 * m[n - 1] * m[n - 1] - 2.0 * m[n - 2] * m[n - 2])
            / (1.0 - 2.0 * a_n * a_n - 2.0 * a_n1 * a_n1);
        let phi_sqrt = phi.sqrt();
        a[n - 1] = a_n;
        a[n - 2] = a_n1;
        a[0] = -a_n;
        a[1] = -a_n1;
        for i in 2..n - 2 {
            a[i] = m[i] / phi_sqrt;
        }
    } else {
        let a_n = if n == 3 {
            std::f64::consts::FRAC_1_SQRT_2
        } else {
            poly(&[0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056], u)
                + m[n - 1] / m_sq_sum.sqrt()
        };
        let phi = if n == 3 {
            1.0
        } else {
            (m_sq_sum - 2.0 * m[n - 1] * m[n - 1]) / (1.0 - 2.0 * a_n * a_n)
        };
        let phi_sqrt = phi.sqrt();
        a[n - 1] = a_n;
        a[0] = -a_n;
        for i in 1..n - 1 {
            a[i] = m[i] / phi_sqrt;
        }
    }

    // W = (sum a_i x_(i))^2 / sum (x_i - xbar)^2
    let xbar = mean(&x);
    let numerator: f64 = a.iter().zip(&x).map(|(ai, xi)| ai * xi).sum::<f64>();
    let denominator: f64 = x.iter().map(|xi| (xi - xbar) * (xi - xbar)).sum();
    let w = ((numerator * numerator) / denominator).min(1.0);

    // Royston's p-value transformation
    let p_value = if n == 3 {
        let pi6 = 6.0 / std::f64::consts::PI;
        let stqr = (0.75f64.sqrt()).asin();
        (pi6 * (w.sqrt().asin() - stqr)).clamp(0.0, 1.0)
    } else if n <= 11 {
        let gamma = poly(&[-2.273, 0.459], nf);
        let y = -(gamma - (1.0 - w).ln()).ln();
        let mu = poly(&[0.5440, -0.39978, 0.025054, -0.0006714], nf);
        let sigma = poly(&[1.3822, -0.77857, 0.062767, -0.0020322], nf).exp();
        1.0 - standard_normal.cdf((y - mu) / sigma)
    } else {
        let ln_n = nf.ln();
        let y = (1.0 - w).ln();
        let mu = poly(&[-1.5861, -0.31082, -0.083751, 0.0038915], ln_n);
        let sigma = poly(&[-0.4803, -0.082676, 0.0030302], ln_n).exp();
        1.0 - standard_normal.cdf((y - mu) / sigma)
    };

    Ok(TestResult {
        statistic: w,
        p_value: p_value.clamp(0.0, 1.0),
    })
}
