use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use tekx_common::report::{self, ColumnLayout, ExportOutcome, ReportRow};
use tekx_model::{DeviceReading, DeviceState, TIMESTAMP_FORMAT};

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tekx-{}-{name}.xlsx", std::process::id()))
}

/// Reads every row of the `Trend` sheet and removes the file.
fn read_back(path: &Path) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Trend".to_string()]);

    let range = workbook.worksheet_range("Trend").unwrap();
    let rows = range.rows().map(|row| row.to_vec()).collect::<Vec<_>>();

    std::fs::remove_file(path).unwrap();
    rows
}

fn text(cell: &Data) -> &str {
    match cell {
        Data::String(s) => s,
        other => panic!("expected a string cell, got {other:?}"),
    }
}

fn number(cell: &Data) -> f64 {
    match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        other => panic!("expected a number cell, got {other:?}"),
    }
}

fn header(titles: &[&str]) -> Vec<Data> {
    titles.iter().map(|t| Data::String(t.to_string())).collect()
}

fn assert_timestamp(cell: &Data, row: &ReportRow) {
    assert_eq!(text(cell), row.timestamp);
    assert!(chrono::NaiveDateTime::parse_from_str(text(cell), TIMESTAMP_FORMAT).is_ok());
}

#[test]
fn test_export_composite_report() {
    let mut state = DeviceState::seeded(8);
    let trend = state.observe_week();
    let rows = report::to_rows(&trend);
    let path = scratch_path("composite");

    let outcome = report::export_trend(&trend, Some(path.as_path())).unwrap();
    assert_eq!(outcome, ExportOutcome::Written(path.clone()));

    let sheet = read_back(&path);
    assert_eq!(sheet.len(), 1 + 7);
    assert_eq!(sheet[0], header(&["Timestamp", "Status"]));

    for (cells, row) in sheet[1..].iter().zip(&rows) {
        assert_eq!(cells.len(), 2);
        assert_timestamp(&cells[0], row);

        let status = serde_json::from_str::<DeviceReading>(text(&cells[1])).unwrap();
        assert_eq!(status.a, row.status.a);
        assert_eq!(status.b, row.status.b);
        assert_eq!(status.do1, row.status.do1);
        assert_eq!(status.do2, row.status.do2);
        assert!((status.tx - row.status.tx).abs() < 1e-9);
    }
}

#[test]
fn test_export_flattened_report() {
    let mut state = DeviceState::seeded(8);
    let rows = report::to_rows(&state.observe_trend(14));
    let path = scratch_path("flattened");

    let outcome = report::write_spreadsheet_with(&rows, Some(path.as_path()), ColumnLayout::Flattened).unwrap();
    assert_eq!(outcome, ExportOutcome::Written(path.clone()));

    let sheet = read_back(&path);
    assert_eq!(sheet.len(), 1 + 14);
    assert_eq!(sheet[0], header(&["Timestamp", "A", "B", "DO1", "DO2", "Tx"]));

    for (cells, row) in sheet[1..].iter().zip(&rows) {
        let status = &row.status;
        assert_eq!(cells.len(), 6);
        assert_timestamp(&cells[0], row);

        assert_eq!(number(&cells[1]), f64::from(status.a.as_u8()));
        assert_eq!(number(&cells[2]), f64::from(status.b.as_u8()));
        assert_eq!(number(&cells[3]), f64::from(status.do1.as_u8()));
        assert_eq!(number(&cells[4]), f64::from(status.do2.as_u8()));
        assert!((number(&cells[5]) - status.tx).abs() < 1e-9);
    }
}

#[test]
fn test_export_empty_trend_writes_header_only_workbook() {
    let path = scratch_path("empty");

    let outcome = report::write_spreadsheet(&[], Some(path.as_path())).unwrap();
    assert_eq!(outcome, ExportOutcome::Written(path.clone()));

    let sheet = read_back(&path);
    assert_eq!(sheet, vec![header(&["Timestamp", "Status"])]);
}

#[test]
fn test_canceled_export_touches_nothing() {
    let mut state = DeviceState::seeded(8);
    let trend = state.observe_week();

    assert_eq!(report::export_trend(&trend, None).unwrap(), ExportOutcome::Canceled);
}
