use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bidtest::cli::{Cli, OutputFormat};
use bidtest::dataset::{load_workbook, CombinedFrame};
use bidtest::describe::summarize;
use bidtest::experiment::assess_experiment;
use bidtest::outliers::cap_purchases;

/// Initialize the tracing subscriber; diagnostics go to stderr so stdout
/// stays the report surface
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.to_config();

    let (control, test) = load_workbook(&cli.workbook, &config.control_sheet, &config.test_sheet)
        .with_context(|| format!("loading experiment workbook {}", cli.workbook.display()))?;

    let text_output = matches!(cli.format, OutputFormat::Text);
    if text_output && !cli.no_describe {
        print!("{}", summarize(&control, config.head));
        print!("{}", summarize(&test, config.head));
    }

    let (control, control_thresholds) = cap_purchases(&control);
    let (test, test_thresholds) = cap_purchases(&test);
    if text_output {
        println!(
            "Purchase capping thresholds: Control [{:.5}, {:.5}], Test [{:.5}, {:.5}]",
            control_thresholds.low, control_thresholds.up, test_thresholds.low, test_thresholds.up
        );
    }

    let combined = CombinedFrame::concat(&control, &test);
    tracing::debug!(rows = combined.len(), "arms labeled and merged");

    let assessment =
        assess_experiment(&combined, &config).context("running hypothesis tests on Purchase")?;

    match cli.format {
        OutputFormat::Text => print!("{}", assessment.to_report_string()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&assessment)
                .context("serializing assessment to JSON")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
