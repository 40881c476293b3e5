//! Experiment dataset types and the two-sheet workbook loader
//!
//! An experiment arrives as one xlsx workbook with a control sheet and a
//! test sheet, each carrying the same four numeric columns. Loading either
//! sheet incompletely is fatal; nothing downstream runs on partial data.

use std::fmt;
use std::path::Path;

use calamine::{open_workbook, Data, DataType, Range, Reader, Xlsx};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced while reading the experiment workbook
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to open workbook {path}: {source}")]
    Open {
        path: String,
        source: calamine::XlsxError,
    },

    #[error("workbook has no sheet named {0:?}")]
    SheetMissing(String),

    #[error("failed to read sheet {sheet:?}: {source}")]
    SheetRead {
        sheet: String,
        source: calamine::XlsxError,
    },

    #[error("sheet {sheet:?} has no {column:?} column")]
    ColumnMissing { sheet: String, column: String },

    #[error("sheet {sheet:?} contains no data rows")]
    EmptySheet { sheet: String },

    #[error("sheet {sheet:?} row {row}: column {column:?} is not numeric")]
    NonNumericCell {
        sheet: String,
        row: usize,
        column: String,
    },

    #[error("sheet {sheet:?} row {row}: column {column:?} is empty")]
    MissingCell {
        sheet: String,
        row: usize,
        column: String,
    },
}

/// Experimental arm an observation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Group {
    Control,
    Test,
}

impl Group {
    /// Single-letter label carried by every merged row
    pub fn label(self) -> &'static str {
        match self {
            Group::Control => "C",
            Group::Test => "T",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Group::Control => "Control",
            Group::Test => "Test",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four numeric columns every sheet must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Impression,
    Click,
    Purchase,
    Earning,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Impression,
        Column::Click,
        Column::Purchase,
        Column::Earning,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Impression => "Impression",
            Column::Click => "Click",
            Column::Purchase => "Purchase",
            Column::Earning => "Earning",
        }
    }
}

/// One row of campaign measurements
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub impression: f64,
    pub click: f64,
    pub purchase: f64,
    pub earning: f64,
}

impl Observation {
    pub fn get(&self, column: Column) -> f64 {
        match column {
            Column::Impression => self.impression,
            Column::Click => self.click,
            Column::Purchase => self.purchase,
            Column::Earning => self.earning,
        }
    }
}

/// Ordered observations for one experimental arm
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFrame {
    pub group: Group,
    pub rows: Vec<Observation>,
}

impl GroupFrame {
    pub fn new(group: Group, rows: Vec<Observation>) -> Self {
        Self { group, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Extract one column as a plain vector
    pub fn column_values(&self, column: Column) -> Vec<f64> {
        self.rows.iter().map(|row| row.get(column)).collect()
    }

    /// The target metric of the experiment
    pub fn purchases(&self) -> Vec<f64> {
        self.column_values(Column::Purchase)
    }
}

/// Both arms concatenated, every row tagged with its group label.
/// Control rows always precede Test rows; order within each arm is the
/// order the sheet had.
#[derive(Debug, Clone)]
pub struct CombinedFrame {
    pub rows: Vec<(Group, Observation)>,
}

impl CombinedFrame {
    /// Label and concatenate the two arms. No filtering, no deduplication;
    /// the positional index restarts from zero by construction.
    pub fn concat(control: &GroupFrame, test: &GroupFrame) -> Self {
        let rows = control
            .rows
            .iter()
            .map(|&row| (Group::Control, row))
            .chain(test.rows.iter().map(|&row| (Group::Test, row)))
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Purchase values for one arm, in row order
    pub fn purchases(&self, group: Group) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|(g, _)| *g == group)
            .map(|(_, row)| row.purchase)
            .collect()
    }
}

/// Load both experiment arms from one workbook.
///
/// Sheet names default to "Control Group" / "Test Group" but are
/// configurable; column headers are matched case-insensitively with
/// surrounding whitespace ignored.
pub fn load_workbook(
    path: &Path,
    control_sheet: &str,
    test_sheet: &str,
) -> Result<(GroupFrame, GroupFrame), DataError> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| DataError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let control = read_sheet(&mut workbook, control_sheet, Group::Control)?;
    let test = read_sheet(&mut workbook, test_sheet, Group::Test)?;
    tracing::debug!(
        control_rows = control.len(),
        test_rows = test.len(),
        "workbook loaded"
    );
    Ok((control, test))
}

fn read_sheet(
    workbook: &mut Xlsx<std::io::BufReader<std::fs::File>>,
    sheet: &str,
    group: Group,
) -> Result<GroupFrame, DataError> {
    if !workbook
        .sheet_names()
        .iter()
        .any(|name| name.as_str() == sheet)
    {
        return Err(DataError::SheetMissing(sheet.to_string()));
    }
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| DataError::SheetRead {
            sheet: sheet.to_string(),
            source,
        })?;
    parse_sheet(&range, sheet, group)
}

fn parse_sheet(range: &Range<Data>, sheet: &str, group: Group) -> Result<GroupFrame, DataError> {
    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| DataError::EmptySheet {
        sheet: sheet.to_string(),
    })?;

    // Map each expected column to its position in the header row
    let mut indices = [0usize; 4];
    for (slot, column) in indices.iter_mut().zip(Column::ALL) {
        let wanted = column.name().to_ascii_lowercase();
        let found = header.iter().position(|cell| {
            cell.as_string()
                .is_some_and(|s| s.trim().eq_ignore_ascii_case(&wanted))
        });
        *slot = found.ok_or_else(|| DataError::ColumnMissing {
            sheet: sheet.to_string(),
            column: column.name().to_string(),
        })?;
    }

    let mut observations = Vec::new();
    for (row_number, row) in rows.enumerate() {
        // Trailing blank rows are common in exported workbooks
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let mut values = [0.0f64; 4];
        for (value, (&index, column)) in values.iter_mut().zip(indices.iter().zip(Column::ALL)) {
            // +2: one for the header, one for 1-based spreadsheet rows
            let spreadsheet_row = row_number + 2;
            let cell = match row.get(index) {
                None | Some(Data::Empty) => {
                    return Err(DataError::MissingCell {
                        sheet: sheet.to_string(),
                        row: spreadsheet_row,
                        column: column.name().to_string(),
                    })
                }
                Some(cell) => cell,
            };
            *value = cell.as_f64().ok_or_else(|| DataError::NonNumericCell {
                sheet: sheet.to_string(),
                row: spreadsheet_row,
                column: column.name().to_string(),
            })?;
        }
        observations.push(Observation {
            impression: values[0],
            click: values[1],
            purchase: values[2],
            earning: values[3],
        });
    }

    if observations.is_empty() {
        return Err(DataError::EmptySheet {
            sheet: sheet.to_string(),
        });
    }
    Ok(GroupFrame::new(group, observations))
}
