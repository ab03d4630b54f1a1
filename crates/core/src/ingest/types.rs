use crate::domain::series::DailyRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One element of the `/total/dayone/country/{code}` response array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DayOneRecord {
    pub country: String,
    pub country_code: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub city_code: String,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lon: String,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
    pub active: u64,
    pub date: DateTime<Utc>,
}

pub type DayOneResponse = Vec<DayOneRecord>;

impl From<DayOneRecord> for DailyRecord {
    fn from(r: DayOneRecord) -> Self {
        Self {
            country: r.country,
            country_code: r.country_code,
            date: r.date.date_naive(),
            confirmed: r.confirmed,
            deaths: r.deaths,
            recovered: r.recovered,
            active: r.active,
        }
    }
}
