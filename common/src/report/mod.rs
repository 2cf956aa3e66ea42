// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

//! Turning a [`tekx_model::Trend`] into a spreadsheet report.

mod rows;

#[cfg(feature = "xlsx")]
mod xlsx;

pub use rows::{to_rows, ReportRow};

#[cfg(feature = "xlsx")]
pub use xlsx::{export_trend, write_spreadsheet, write_spreadsheet_with, ExportError};

/// How a reading is laid out in the sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnLayout {
    /// `Timestamp | Status`, with the whole reading as a JSON object in the Status cell.
    #[default]
    Composite,

    /// `Timestamp | A | B | DO1 | DO2 | Tx`, one number per cell.
    Flattened,
}

/// What happened to an export request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The workbook was saved to this path.
    Written(std::path::PathBuf),

    /// No destination was chosen; nothing was written.
    Canceled,
}
