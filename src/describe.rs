//! Descriptive summary of one experiment arm
//!
//! `summarize` is pure and returns a structured `FrameSummary`; rendering to
//! the console is a separate concern so tests can assert on fields instead
//! of scraping text. Diagnostics only: nothing downstream branches on the
//! summary.

use std::fmt;

use serde::Serialize;

use crate::dataset::{Column, GroupFrame, Observation};
use crate::stats::{mean, quantile, sample_std};

/// Deciles reported per column, matching the reference analysis grid
const PERCENTILES: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];

/// Distribution summary for one numeric column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: &'static str,
    pub dtype: &'static str,
    pub count: usize,
    /// Always zero after a successful load; reported anyway so the summary
    /// shape matches the diagnostic output users expect
    pub missing: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    /// Values at the `PERCENTILES` grid, in order
    pub percentiles: Vec<f64>,
    pub max: f64,
}

/// Structured descriptive report for one arm
#[derive(Debug, Clone, Serialize)]
pub struct FrameSummary {
    pub group: &'static str,
    pub rows: usize,
    pub cols: usize,
    pub head: Vec<Observation>,
    pub tail: Vec<Observation>,
    pub columns: Vec<ColumnSummary>,
}

/// Build the descriptive report for one arm. `head` bounds how many leading
/// and trailing rows are included.
pub fn summarize(frame: &GroupFrame, head: usize) -> FrameSummary {
    let columns = Column::ALL
        .iter()
        .map(|&column| {
            let values = frame.column_values(column);
            ColumnSummary {
                name: column.name(),
                dtype: "f64",
                count: values.len(),
                missing: 0,
                mean: mean(&values),
                std: sample_std(&values),
                min: quantile(&values, 0.0),
                percentiles: PERCENTILES.iter().map(|&q| quantile(&values, q)).collect(),
                max: quantile(&values, 1.0),
            }
        })
        .collect();

    let n = frame.len();
    FrameSummary {
        group: frame.group.name(),
        rows: n,
        cols: Column::ALL.len(),
        head: frame.rows.iter().take(head).copied().collect(),
        tail: frame.rows.iter().skip(n.saturating_sub(head)).copied().collect(),
        columns,
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{:-^70}", format!(" {title} "))
}

fn write_rows(f: &mut fmt::Formatter<'_>, rows: &[Observation]) -> fmt::Result {
    writeln!(
        f,
        "{:>12} {:>12} {:>12} {:>12}",
        "Impression", "Click", "Purchase", "Earning"
    )?;
    for row in rows {
        writeln!(
            f,
            "{:>12.5} {:>12.5} {:>12.5} {:>12.5}",
            row.impression, row.click, row.purchase, row.earning
        )?;
    }
    Ok(())
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:=^70}", format!(" {} Group ", self.group))?;
        section(f, "SHAPE")?;
        writeln!(f, "Rows: {}", self.rows)?;
        writeln!(f, "Columns: {}", self.cols)?;

        section(f, "TYPES")?;
        for column in &self.columns {
            writeln!(f, "{:<12} {}", column.name, column.dtype)?;
        }

        section(f, "HEAD")?;
        write_rows(f, &self.head)?;
        section(f, "TAIL")?;
        write_rows(f, &self.tail)?;

        section(f, "MISSING VALUES")?;
        for column in &self.columns {
            writeln!(f, "{:<12} {}", column.name, column.missing)?;
        }

        section(f, "DESCRIBE")?;
        write!(f, "{:<12} {:>8} {:>12} {:>12} {:>12}", "", "count", "mean", "std", "min")?;
        for q in PERCENTILES {
            write!(f, " {:>11.0}%", q * 100.0)?;
        }
        writeln!(f, " {:>12}", "max")?;
        for column in &self.columns {
            write!(
                f,
                "{:<12} {:>8} {:>12.5} {:>12.5} {:>12.5}",
                column.name, column.count, column.mean, column.std, column.min
            )?;
            for value in &column.percentiles {
                write!(f, " {value:>12.5}")?;
            }
            writeln!(f, " {:>12.5}", column.max)?;
        }
        Ok(())
    }
}
