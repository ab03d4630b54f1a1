//! Per-country metric derivation over a day-one series.
//!
//! Deltas are baseline-inclusive: the first delta is measured against 0, and
//! both delta series have exactly one entry per record.

use crate::domain::series::CountrySeries;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// `floor(deaths / confirmed * 100)` on the last record, 0 when nothing is confirmed.
    pub death_rate_percent: u8,
    /// Index of the first record with deaths > 0, or 0 when there is none.
    pub days_to_first_death: usize,
    pub first_death_index: Option<usize>,
    pub daily_delta_confirmed: Vec<i64>,
    pub daily_delta_deaths: Vec<i64>,
    pub last_confirmed: u64,
    pub last_deaths: u64,
}

/// Derives metrics for a non-empty series. An empty series yields all-zero
/// metrics with empty delta vectors; callers skip empty series before this.
pub fn derive(series: &CountrySeries) -> DerivedMetrics {
    let mut daily_delta_confirmed = Vec::with_capacity(series.len());
    let mut daily_delta_deaths = Vec::with_capacity(series.len());
    let mut first_death_index = None;

    let mut prev_confirmed: u64 = 0;
    let mut prev_deaths: u64 = 0;
    for (idx, record) in series.records.iter().enumerate() {
        daily_delta_confirmed.push(delta(record.confirmed, prev_confirmed));
        daily_delta_deaths.push(delta(record.deaths, prev_deaths));
        if first_death_index.is_none() && record.deaths > 0 {
            first_death_index = Some(idx);
        }
        prev_confirmed = record.confirmed;
        prev_deaths = record.deaths;
    }

    let (last_confirmed, last_deaths) = series
        .last()
        .map(|r| (r.confirmed, r.deaths))
        .unwrap_or((0, 0));

    DerivedMetrics {
        death_rate_percent: death_rate_percent(last_deaths, last_confirmed),
        days_to_first_death: first_death_index.unwrap_or(0),
        first_death_index,
        daily_delta_confirmed,
        daily_delta_deaths,
        last_confirmed,
        last_deaths,
    }
}

/// Truncated integer percentage, clamped to 0..=100.
pub fn death_rate_percent(deaths: u64, confirmed: u64) -> u8 {
    if confirmed == 0 {
        return 0;
    }
    let pct = (u128::from(deaths) * 100) / u128::from(confirmed);
    pct.min(100) as u8
}

// Upstream corrections can shrink a cumulative count, so deltas are signed.
fn delta(current: u64, previous: u64) -> i64 {
    (i128::from(current) - i128::from(previous)).clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::DailyRecord;
    use chrono::NaiveDate;

    fn series(points: &[(u64, u64)]) -> CountrySeries {
        let records = points
            .iter()
            .enumerate()
            .map(|(i, &(confirmed, deaths))| DailyRecord {
                country: "Testland".to_string(),
                country_code: "TL".to_string(),
                date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(i as u64),
                confirmed,
                deaths,
                recovered: 0,
                active: confirmed.saturating_sub(deaths),
            })
            .collect();
        CountrySeries::new("tl", records)
    }

    #[test]
    fn derives_two_day_example() {
        let m = derive(&series(&[(10, 0), (15, 1)]));
        assert_eq!(m.daily_delta_confirmed, vec![10, 5]);
        assert_eq!(m.daily_delta_deaths, vec![0, 1]);
        assert_eq!(m.days_to_first_death, 1);
        assert_eq!(m.first_death_index, Some(1));
        assert_eq!(m.death_rate_percent, 6);
        assert_eq!((m.last_confirmed, m.last_deaths), (15, 1));
    }

    #[test]
    fn delta_series_share_the_record_count() {
        let s = series(&[(1, 0), (4, 0), (9, 1), (9, 2), (20, 2)]);
        let m = derive(&s);
        assert_eq!(m.daily_delta_confirmed.len(), s.len());
        assert_eq!(m.daily_delta_deaths.len(), s.len());
        assert_eq!(m.daily_delta_confirmed, vec![1, 3, 5, 0, 11]);
        assert_eq!(m.daily_delta_deaths, vec![0, 0, 1, 1, 0]);
    }

    #[test]
    fn no_deaths_means_zero_rate_and_zero_days() {
        let m = derive(&series(&[(3, 0), (7, 0)]));
        assert_eq!(m.death_rate_percent, 0);
        assert_eq!(m.days_to_first_death, 0);
        assert_eq!(m.first_death_index, None);
    }

    #[test]
    fn death_on_day_zero_is_distinguishable() {
        let m = derive(&series(&[(5, 1), (6, 1)]));
        assert_eq!(m.days_to_first_death, 0);
        assert_eq!(m.first_death_index, Some(0));
    }

    #[test]
    fn zero_confirmed_rate_is_zero() {
        assert_eq!(death_rate_percent(0, 0), 0);
        assert_eq!(death_rate_percent(3, 0), 0);
        let m = derive(&series(&[(0, 0)]));
        assert_eq!(m.death_rate_percent, 0);
    }

    #[test]
    fn rate_truncates_and_clamps() {
        assert_eq!(death_rate_percent(2, 3), 66);
        assert_eq!(death_rate_percent(1, 1), 100);
        assert_eq!(death_rate_percent(5, 2), 100);
    }

    #[test]
    fn corrections_produce_negative_deltas() {
        let m = derive(&series(&[(10, 2), (8, 1)]));
        assert_eq!(m.daily_delta_confirmed, vec![10, -2]);
        assert_eq!(m.daily_delta_deaths, vec![2, -1]);
    }

    #[test]
    fn empty_series_is_all_zero() {
        let m = derive(&CountrySeries::new("tl", vec![]));
        assert!(m.daily_delta_confirmed.is_empty());
        assert!(m.daily_delta_deaths.is_empty());
        assert_eq!(m.death_rate_percent, 0);
    }
}
