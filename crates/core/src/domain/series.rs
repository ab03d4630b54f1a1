use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of cumulative counts for a country, as reported upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub country: String,
    pub country_code: String,
    pub date: NaiveDate,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
    pub active: u64,
}

/// Day-one series for a single country code, ordered by date ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySeries {
    /// Normalized (trimmed, lowercase) code the series was requested with.
    pub code: String,
    pub records: Vec<DailyRecord>,
}

impl CountrySeries {
    pub fn new(code: impl Into<String>, records: Vec<DailyRecord>) -> Self {
        Self {
            code: code.into(),
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn last(&self) -> Option<&DailyRecord> {
        self.records.last()
    }

    /// Display name taken from the first record; falls back to the code.
    pub fn country_name(&self) -> &str {
        self.records
            .first()
            .map(|r| r.country.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.code)
    }
}

/// Trims and lowercases a user-supplied country code.
pub fn normalize_country_code(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}
