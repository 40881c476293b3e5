//! CLI argument parsing for bidtest

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::experiment::ExperimentConfig;

/// Output format for the experiment report
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "bidtest")]
#[command(version)]
#[command(about = "A/B hypothesis test on the Purchase metric of a two-sheet experiment workbook", long_about = None)]
pub struct Cli {
    /// Path to the xlsx workbook holding both experiment arms
    pub workbook: PathBuf,

    /// Significance level (alpha) for every statistical test
    #[arg(long = "alpha", value_name = "ALPHA", default_value = "0.05")]
    pub alpha: f64,

    /// Sheet name of the control arm
    #[arg(long = "control-sheet", value_name = "NAME", default_value = "Control Group")]
    pub control_sheet: String,

    /// Sheet name of the test arm
    #[arg(long = "test-sheet", value_name = "NAME", default_value = "Test Group")]
    pub test_sheet: String,

    /// Rows shown in the descriptive summary head/tail
    #[arg(long = "head", value_name = "N", default_value = "5")]
    pub head: usize,

    /// Skip the per-arm descriptive summary tables
    #[arg(long = "no-describe")]
    pub no_describe: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl Cli {
    pub fn to_config(&self) -> ExperimentConfig {
        ExperimentConfig {
            alpha: self.alpha,
            control_sheet: self.control_sheet.clone(),
            test_sheet: self.test_sheet.clone(),
            head: self.head,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_workbook_path() {
        let cli = Cli::parse_from(["bidtest", "ab_campaign.xlsx"]);
        assert_eq!(cli.workbook, PathBuf::from("ab_campaign.xlsx"));
        assert_eq!(cli.alpha, 0.05);
        assert!(!cli.no_describe);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "bidtest",
            "data.xlsx",
            "--alpha",
            "0.01",
            "--control-sheet",
            "A",
            "--test-sheet",
            "B",
            "--head",
            "3",
            "--no-describe",
        ]);
        let config = cli.to_config();
        assert_eq!(config.alpha, 0.01);
        assert_eq!(config.control_sheet, "A");
        assert_eq!(config.test_sheet, "B");
        assert_eq!(config.head, 3);
        assert!(cli.no_describe);
    }

    #[test]
    fn test_cli_format_json() {
        let cli = Cli::parse_from(["bidtest", "data.xlsx", "--format", "json"]);
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
