//! Spreadsheet export for the two report screens.
//!
//! DESIGN
//! ======
//! Layout and file naming are computed first as plain data (`ReportLayout`),
//! then handed to `rust_xlsxwriter`. Keeping the layout pure means header
//! blocks and file names can be checked without opening a workbook.

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Workbook, XlsxError};

use super::hours;
use crate::net::types::{AttendanceRecord, HoursSummary, Period};

/// Shown for any export failure.
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to generate report";
const NOT_PROVIDED: &str = "Not provided";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("spreadsheet construction failed: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("report does not fit in a worksheet")]
    TooLarge,
}

impl ExportError {
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        EXPORT_FAILED_MESSAGE
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A single-sheet workbook described as rows of cells.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportLayout {
    pub sheet_name: String,
    pub file_name: String,
    /// Header block followed by the body; an empty row is a blank line.
    pub rows: Vec<Vec<Cell>>,
    pub column_widths: Vec<f64>,
}

/// `"{start} to {end}"` with missing bounds spelled out.
#[must_use]
pub fn period_label(period: &Period) -> String {
    let bound = |value: &str| {
        if value.trim().is_empty() { NOT_PROVIDED.to_owned() } else { value.to_owned() }
    };
    format!("{} to {}", bound(&period.start), bound(&period.end))
}

/// One employee's punches with totals.
#[must_use]
pub fn records_report(employee_name: &str, period: &Period, records: &[AttendanceRecord]) -> ReportLayout {
    let total = hours::format_hhmm(hours::total_worked(records));
    #[allow(clippy::cast_precision_loss)]
    let count = records.len() as f64;

    let mut rows = vec![
        vec![Cell::from("Attendance Records Report")],
        vec![],
        vec![Cell::from("Employee:"), Cell::from(employee_name)],
        vec![Cell::from("Period:"), Cell::from(period_label(period))],
        vec![Cell::from("Total records:"), Cell::Number(count)],
        vec![Cell::from("Total hours worked:"), Cell::from(total)],
        vec![],
        vec![Cell::from("Date"), Cell::from("Time"), Cell::from("Type"), Cell::from("Notes")],
    ];
    rows.extend(records.iter().map(|record| {
        let (_, time) = record.date_and_time();
        vec![
            Cell::from(record.display_date()),
            Cell::from(time),
            Cell::from(record.kind.label()),
            Cell::from(""),
        ]
    }));

    ReportLayout {
        sheet_name: "Registros".to_owned(),
        file_name: format!(
            "Registros_{}_{}_a_{}.xlsx",
            underscore_whitespace(employee_name),
            period.start,
            period.end
        ),
        rows,
        column_widths: vec![12.0, 10.0, 10.0, 30.0],
    }
}

/// Per-employee worked-hours totals for the whole company.
#[must_use]
pub fn hours_report(period: &Period, summaries: &[HoursSummary]) -> ReportLayout {
    let mut rows = vec![
        vec![Cell::from("Consolidated Worked Hours Report")],
        vec![],
        vec![Cell::from("Period:"), Cell::from(period_label(period))],
        vec![],
        vec![Cell::from("Employee"), Cell::from("Hours worked")],
    ];
    rows.extend(summaries.iter().map(|summary| {
        vec![
            Cell::from(summary.employee_name.as_deref().unwrap_or("Unknown")),
            Cell::from(summary.hours_worked.as_deref().unwrap_or("N/A")),
        ]
    }));

    ReportLayout {
        sheet_name: "Horas Trabalhadas".to_owned(),
        file_name: format!("Horas_Trabalhadas_{}_a_{}.xlsx", period.start, period.end),
        rows,
        column_widths: vec![30.0, 20.0],
    }
}

fn underscore_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Build the workbook in memory.
///
/// # Errors
///
/// Returns an error if the layout does not fit a worksheet or the writer
/// rejects a value.
pub fn to_workbook(layout: &ReportLayout) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(layout.sheet_name.as_str())?;

    for (row_index, row) in layout.rows.iter().enumerate() {
        let row_index = u32::try_from(row_index).map_err(|_| ExportError::TooLarge)?;
        for (col_index, cell) in row.iter().enumerate() {
            let col_index = u16::try_from(col_index).map_err(|_| ExportError::TooLarge)?;
            match cell {
                Cell::Text(text) => {
                    sheet.write_string(row_index, col_index, text.as_str())?;
                }
                Cell::Number(number) => {
                    sheet.write_number(row_index, col_index, *number)?;
                }
            }
        }
    }
    for (col_index, width) in layout.column_widths.iter().enumerate() {
        let col_index = u16::try_from(col_index).map_err(|_| ExportError::TooLarge)?;
        sheet.set_column_width(col_index, *width)?;
    }
    Ok(workbook)
}

/// Write the report into `dir` under its computed file name.
///
/// # Errors
///
/// Returns an error if the workbook cannot be built or saved.
pub fn write_report(layout: &ReportLayout, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(&layout.file_name);
    let mut workbook = to_workbook(layout)?;
    workbook.save(&path)?;
    tracing::info!(path = %path.display(), rows = layout.rows.len(), "report exported");
    Ok(path)
}
