// Configuration for the experiment assessment
//
// The significance level is an explicit parameter threaded through the
// tester rather than a shared constant, so callers can tighten or loosen it
// per run.

use serde::{Deserialize, Serialize};

/// Configuration for loading and assessing one A/B experiment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Statistical significance level (alpha) applied to every test:
    /// normality per arm, homogeneity of variance, and the final comparison.
    ///
    /// - 0.05 (default): 95% confidence, the conventional choice
    /// - 0.01: stricter, fewer false positives
    pub alpha: f64,

    /// Workbook sheet holding the control arm
    pub control_sheet: String,

    /// Workbook sheet holding the test arm
    pub test_sheet: String,

    /// Rows shown in the descriptive summary's head and tail
    pub head: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            control_sheet: "Control Group".to_string(),
            test_sheet: "Test Group".to_string(),
            head: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_procedure() {
        let config = ExperimentConfig::default();
        assert_eq!(config.alpha, 0.05);
        assert_eq!(config.control_sheet, "Control Group");
        assert_eq!(config.test_sheet, "Test Group");
        assert_eq!(config.head, 5);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = ExperimentConfig {
            alpha: 0.01,
            ..ExperimentConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ExperimentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.alpha, 0.01);
        assert_eq!(back.test_sheet, config.test_sheet);
    }
}
