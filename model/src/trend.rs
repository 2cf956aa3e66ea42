use chrono::NaiveDateTime;

use crate::reading::DeviceReading;

/// How trend timestamps are rendered, e.g. `2024-05-01 13:45:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One day of a trend: when, and what the device read.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendRecord {
    /// Local wall-clock time.
    pub timestamp: NaiveDateTime,
    pub reading: DeviceReading,
}

impl TrendRecord {
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl std::fmt::Display for TrendRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Date: {}, Status: {}", self.formatted_timestamp(), self.reading)
    }
}

/// Daily records ordered from the most recent to the oldest.
///
/// A trend is built once and then only read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trend(Vec<TrendRecord>);

impl Trend {
    pub fn records(&self) -> &[TrendRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrendRecord> {
        self.0.iter()
    }

    /// The oldest record.
    pub fn last(&self) -> Option<&TrendRecord> {
        self.0.last()
    }
}

impl FromIterator<TrendRecord> for Trend {
    fn from_iter<I: IntoIterator<Item = TrendRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Trend {
    type Item = TrendRecord;
    type IntoIter = std::vec::IntoIter<TrendRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Trend {
    type Item = &'a TrendRecord;
    type IntoIter = std::slice::Iter<'a, TrendRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[test]
fn test_record_display() {
    let timestamp = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(13, 45, 0)
        .unwrap();
    let record = TrendRecord {
        timestamp,
        reading: DeviceReading::default(),
    };

    assert_eq!(record.formatted_timestamp(), "2024-05-01 13:45:00");
    assert_eq!(
        record.to_string(),
        "Date: 2024-05-01 13:45:00, Status: A=0 B=0 DO1=0 DO2=0 Tx=25.00 °C"
    );
}
