//! Outlier capping for the purchase metric
//!
//! Thresholds come from the 1st and 99th percentiles with 1.5 * IQR fences,
//! computed per arm so one group's extremes never move the other's bounds.
//! Capping returns a new frame instead of mutating in place, which keeps the
//! stage composable and makes the idempotence property trivial to test.

use serde::Serialize;

use crate::dataset::GroupFrame;
use crate::stats::quantile;

/// Lower/upper capping bounds for one arm's purchase values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub low: f64,
    pub up: f64,
}

/// Compute capping thresholds from the purchase column.
///
/// Q1 is the 1st percentile and Q3 the 99th; with IQR = Q3 - Q1 the bounds
/// are Q1 - 1.5 * IQR and Q3 + 1.5 * IQR. When IQR is zero both bounds
/// collapse to Q1 and capping flattens the column to a single value; that is
/// the defined behavior for a degenerate column, not a defect.
pub fn purchase_thresholds(frame: &GroupFrame) -> Thresholds {
    let values = frame.purchases();
    let q1 = quantile(&values, 0.01);
    let q3 = quantile(&values, 0.99);
    let iqr = q3 - q1;
    Thresholds {
        low: q1 - 1.5 * iqr,
        up: q3 + 1.5 * iqr,
    }
}

/// Return a copy of the frame with purchase values clamped into the arm's
/// own thresholds. Other columns are untouched.
///
/// Idempotent: after one pass every value lies within the bounds, so the
/// recomputed percentiles leave a second pass with nothing to change.
pub fn cap_purchases(frame: &GroupFrame) -> (GroupFrame, Thresholds) {
    let thresholds = purchase_thresholds(frame);
    let mut capped = frame.clone();
    let mut changed = 0usize;
    for row in &mut capped.rows {
        let clamped = row.purchase.clamp(thresholds.low, thresholds.up);
        if clamped != row.purchase {
            changed += 1;
            row.purchase = clamped;
        }
    }
    tracing::debug!(
        group = %frame.group,
        low = thresholds.low,
        up = thresholds.up,
        capped_rows = changed,
        "purchase outliers capped"
    );
    (capped, thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Group, Observation};

    fn frame(group: Group, purchases: &[f64]) -> GroupFrame {
        let rows = purchases
            .iter()
            .map(|&purchase| Observation {
                impression: 1000.0,
                click: 50.0,
                purchase,
                earning: 200.0,
            })
            .collect();
        GroupFrame::new(group, rows)
    }

    /// Large-enough arm that the 99th percentile sits below a lone extreme
    /// value, so the upper fence actually bites
    fn arm_with_spike() -> GroupFrame {
        let mut purchases: Vec<f64> = (1..=150).map(f64::from).collect();
        purchases[149] = 1_000_000.0;
        frame(Group::Control, &purchases)
    }

    #[test]
    fn test_extreme_value_capped_with_own_thresholds() {
        // Control carries the outlier; Test must not influence its bounds
        let control = frame(Group::Control, &[1.0, 2.0, 3.0, 4.0, 100.0]);
        let test = frame(Group::Test, &[2.0, 3.0, 4.0, 5.0, 6.0]);

        let (capped_control, thresholds) = cap_purchases(&control);
        let max = capped_control
            .purchases()
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(max <= thresholds.up);

        // The clean arm is left alone
        let (capped_test, _) = cap_purchases(&test);
        assert_eq!(capped_test.purchases(), test.purchases());
    }

    #[test]
    fn test_spike_is_pulled_down_to_the_upper_fence() {
        let arm = arm_with_spike();
        let (capped, thresholds) = cap_purchases(&arm);
        let max = capped
            .purchases()
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(max <= thresholds.up);
        assert!(max < 1_000_000.0, "spike survived capping: {max}");
    }

    #[test]
    fn test_all_values_within_bounds_after_capping() {
        let arm = arm_with_spike();
        let (capped, thresholds) = cap_purchases(&arm);
        for v in capped.purchases() {
            assert!(thresholds.low <= v && v <= thresholds.up);
        }
    }

    #[test]
    fn test_capping_is_idempotent() {
        let arm = arm_with_spike();
        let (once, _) = cap_purchases(&arm);
        let (twice, _) = cap_purchases(&once);
        assert_eq!(once.purchases(), twice.purchases());
    }

    #[test]
    fn test_zero_iqr_collapses_column() {
        let arm = frame(Group::Control, &[7.0, 7.0, 7.0, 7.0]);
        let (capped, thresholds) = cap_purchases(&arm);
        assert_eq!(thresholds.low, thresholds.up);
        assert!(capped.purchases().iter().all(|&v| v == 7.0));
    }

    #[test]
    fn test_other_columns_untouched() {
        let arm = frame(Group::Control, &[1.0, 2.0, 3.0, 4.0, 100.0]);
        let (capped, _) = cap_purchases(&arm);
        for (before, after) in arm.rows.iter().zip(&capped.rows) {
            assert_eq!(before.impression, after.impression);
            assert_eq!(before.click, after.click);
            assert_eq!(before.earning, after.earning);
        }
    }
}
