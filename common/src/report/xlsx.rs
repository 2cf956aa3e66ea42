// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tekx_model::Trend;

use super::{to_rows, ColumnLayout, ExportOutcome, ReportRow};

const SHEET_NAME: &str = "Trend";
const COMPOSITE_HEADER: [&str; 2] = ["Timestamp", "Status"];
const FLATTENED_HEADER: [&str; 6] = ["Timestamp", "A", "B", "DO1", "DO2", "Tx"];

/// Errors raised while writing a report.
#[derive(Debug)]
pub enum ExportError {
    /// The destination could not be written.
    Io(std::io::Error),

    /// The workbook itself could not be assembled.
    Workbook(XlsxError),

    /// A reading could not be encoded for the Status cell.
    Encode(serde_json::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "export: {e}"),
            Self::Workbook(e) => write!(f, "export: workbook: {e}"),
            Self::Encode(e) => write!(f, "export: status cell: {e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Workbook(e) => Some(e),
            Self::Encode(e) => Some(e),
        }
    }
}

impl From<XlsxError> for ExportError {
    fn from(e: XlsxError) -> Self {
        match e {
            XlsxError::IoError(io) => Self::Io(io),
            other => Self::Workbook(other),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e)
    }
}

/// Writes `rows` to an `.xlsx` workbook at `path` using [`ColumnLayout::Composite`].
///
/// A missing or empty `path` means no destination was chosen: nothing is written and
/// [`ExportOutcome::Canceled`] is returned.
pub fn write_spreadsheet(rows: &[ReportRow], path: Option<&Path>) -> Result<ExportOutcome, ExportError> {
    write_spreadsheet_with(rows, path, ColumnLayout::default())
}

pub fn write_spreadsheet_with(
    rows: &[ReportRow],
    path: Option<&Path>,
    layout: ColumnLayout,
) -> Result<ExportOutcome, ExportError> {
    let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
        log::info!("Export canceled, no destination chosen");
        return Ok(ExportOutcome::Canceled);
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    match layout {
        ColumnLayout::Composite => write_composite(worksheet, rows)?,
        ColumnLayout::Flattened => write_flattened(worksheet, rows)?,
    }

    if let Err(e) = workbook.save(path) {
        log::error!("Could not write report to {}: {e}", path.display());
        return Err(e.into());
    }

    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(ExportOutcome::Written(path.to_path_buf()))
}

/// Runs [`to_rows`] and [`write_spreadsheet`] in one go.
pub fn export_trend(trend: &Trend, path: Option<&Path>) -> Result<ExportOutcome, ExportError> {
    write_spreadsheet(&to_rows(trend), path)
}

fn write_header(worksheet: &mut Worksheet, titles: &[&str]) -> Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    for (col, title) in (0u16..).zip(titles) {
        worksheet.write_string_with_format(0, col, *title, &bold)?;
    }
    worksheet.set_column_width(0, 20)?;
    Ok(())
}

fn write_composite(worksheet: &mut Worksheet, rows: &[ReportRow]) -> Result<(), ExportError> {
    write_header(worksheet, &COMPOSITE_HEADER)?;

    for (row, data) in (1u32..).zip(rows) {
        worksheet.write_string(row, 0, &data.timestamp)?;
        worksheet.write_string(row, 1, serde_json::to_string(&data.status)?)?;
    }
    worksheet.set_column_width(1, 50)?;
    Ok(())
}

fn write_flattened(worksheet: &mut Worksheet, rows: &[ReportRow]) -> Result<(), ExportError> {
    write_header(worksheet, &FLATTENED_HEADER)?;

    for (row, data) in (1u32..).zip(rows) {
        let status = &data.status;
        worksheet.write_string(row, 0, &data.timestamp)?;
        worksheet.write_number(row, 1, status.a.as_u8())?;
        worksheet.write_number(row, 2, status.b.as_u8())?;
        worksheet.write_number(row, 3, status.do1.as_u8())?;
        worksheet.write_number(row, 4, status.do2.as_u8())?;
        worksheet.write_number(row, 5, status.tx)?;
    }
    Ok(())
}

#[test]
fn test_missing_destination_is_canceled() {
    let rows = to_rows(&tekx_model::DeviceState::seeded(1).observe_trend(7));

    assert_eq!(write_spreadsheet(&rows, None).unwrap(), ExportOutcome::Canceled);
    assert_eq!(
        write_spreadsheet(&rows, Some(Path::new(""))).unwrap(),
        ExportOutcome::Canceled
    );
}

#[test]
fn test_unwritable_destination_is_io_error() {
    let rows = to_rows(&tekx_model::DeviceState::seeded(1).observe_trend(7));
    let result = write_spreadsheet(&rows, Some(Path::new("/nonexistent/dir/file.xlsx")));

    assert!(matches!(result, Err(ExportError::Io(_))));
}
