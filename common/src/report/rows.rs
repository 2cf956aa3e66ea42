// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use serde::Serialize;
use tekx_model::{DeviceReading, Trend};

/// One line of the report.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ReportRow {
    /// Formatted as `YYYY-MM-DD HH:MM:SS`.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,

    #[serde(rename = "Status")]
    pub status: DeviceReading,
}

/// One row per record, in the order of the trend.
pub fn to_rows(trend: &Trend) -> Vec<ReportRow> {
    trend
        .iter()
        .map(|record| ReportRow {
            timestamp: record.formatted_timestamp(),
            status: record.reading,
        })
        .collect()
}

#[test]
fn test_rows_follow_trend_order() {
    let mut state = tekx_model::DeviceState::seeded(4);
    let trend = state.observe_trend(7);
    let rows = to_rows(&trend);

    assert_eq!(rows.len(), trend.len());
    for (row, record) in rows.iter().zip(trend.iter()) {
        assert_eq!(row.timestamp, record.formatted_timestamp());
        assert_eq!(row.status, record.reading);
    }
    assert!(rows[0].timestamp > rows[6].timestamp);
}

#[test]
fn test_empty_trend_has_no_rows() {
    assert!(to_rows(&Trend::default()).is_empty());
}

#[test]
fn test_row_serializes_as_composite_status() {
    let record = tekx_model::TrendRecord {
        timestamp: chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap(),
        reading: DeviceReading::default(),
    };
    let rows = to_rows(&std::iter::once(record).collect());

    let json = serde_json::to_value(&rows[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "Timestamp": "2024-01-02 03:04:05",
            "Status": {"A": 0, "B": 0, "DO1": 0, "DO2": 0, "Tx": 25.0}
        })
    );
}
