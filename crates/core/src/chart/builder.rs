//! Chart Builder: turns derived per-country metrics into chart descriptions.
//!
//! Line charts plot day-over-day deltas (new cases, new deaths), never the
//! cumulative totals.

use crate::chart::description::{
    ChartDescription, ChartKind, DisplayOptions, NamedValue, Series, SeriesData,
};
use crate::domain::metrics::DerivedMetrics;
use crate::domain::series::CountrySeries;

const DATE_LABEL_FORMAT: &str = "%b %d";

pub const NEW_CASES_SERIES: &str = "New confirmed cases";
pub const NEW_DEATHS_SERIES: &str = "New deaths";
pub const DEATH_RATE_SERIES: &str = "Death rate (%)";
pub const DAYS_TO_FIRST_DEATH_SERIES: &str = "Days to first death";
pub const CONFIRMED_RING: &str = "Confirmed cases";
pub const DEATHS_RING: &str = "Deaths";

/// What the aggregate charts need from one successfully processed country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountrySummary {
    pub code: String,
    pub name: String,
    pub metrics: DerivedMetrics,
}

impl CountrySummary {
    pub fn new(series: &CountrySeries, metrics: DerivedMetrics) -> Self {
        Self {
            code: series.code.clone(),
            name: series.country_name().to_string(),
            metrics,
        }
    }

    fn axis_label(&self) -> String {
        self.code.to_ascii_uppercase()
    }
}

pub fn build_country_chart(series: &CountrySeries, metrics: &DerivedMetrics) -> ChartDescription {
    let x_axis = series
        .records
        .iter()
        .map(|r| r.date.format(DATE_LABEL_FORMAT).to_string())
        .collect();

    ChartDescription {
        id: chart_id("country", &series.code),
        kind: ChartKind::Line,
        title: format!("COVID cases for {}", series.country_name().to_uppercase()),
        subtitle: Some(format!("Death rate: {}%", metrics.death_rate_percent)),
        x_axis,
        series: vec![
            Series {
                name: NEW_CASES_SERIES.to_string(),
                data: SeriesData::Values(metrics.daily_delta_confirmed.clone()),
                ring: None,
            },
            Series {
                name: NEW_DEATHS_SERIES.to_string(),
                data: SeriesData::Values(metrics.daily_delta_deaths.clone()),
                ring: None,
            },
        ],
        options: DisplayOptions {
            smooth: true,
            mark_average: true,
            ..DisplayOptions::default()
        },
    }
}

/// Builds the (scatter, pie) comparison pair. Country order follows `countries`.
pub fn build_aggregate_charts(
    countries: &[CountrySummary],
) -> (ChartDescription, ChartDescription) {
    (build_scatter_chart(countries), build_pie_chart(countries))
}

fn build_scatter_chart(countries: &[CountrySummary]) -> ChartDescription {
    let x_axis = countries.iter().map(CountrySummary::axis_label).collect();
    let death_rates = countries
        .iter()
        .map(|c| i64::from(c.metrics.death_rate_percent))
        .collect();
    let days_to_first_death = countries
        .iter()
        .map(|c| c.metrics.days_to_first_death as i64)
        .collect();

    ChartDescription {
        id: "aggregate-scatter".to_string(),
        kind: ChartKind::Scatter,
        title: "Death rate and days to first death".to_string(),
        subtitle: Some(format!("{} countries", countries.len())),
        x_axis,
        series: vec![
            Series {
                name: DEATH_RATE_SERIES.to_string(),
                data: SeriesData::Values(death_rates),
                ring: None,
            },
            Series {
                name: DAYS_TO_FIRST_DEATH_SERIES.to_string(),
                data: SeriesData::Values(days_to_first_death),
                ring: None,
            },
        ],
        options: DisplayOptions {
            show_point_labels: true,
            ..DisplayOptions::default()
        },
    }
}

fn build_pie_chart(countries: &[CountrySummary]) -> ChartDescription {
    ChartDescription {
        id: "aggregate-pie".to_string(),
        kind: ChartKind::Pie,
        title: "Confirmed cases and deaths per country".to_string(),
        subtitle: Some("inner: confirmed, outer: deaths".to_string()),
        x_axis: Vec::new(),
        series: vec![
            Series {
                name: CONFIRMED_RING.to_string(),
                data: SeriesData::Named(ring(countries, |m| m.last_confirmed)),
                ring: Some((0, 40)),
            },
            Series {
                name: DEATHS_RING.to_string(),
                data: SeriesData::Named(ring(countries, |m| m.last_deaths)),
                ring: Some((50, 70)),
            },
        ],
        options: DisplayOptions {
            show_point_labels: true,
            ..DisplayOptions::default()
        },
    }
}

fn ring(countries: &[CountrySummary], value: impl Fn(&DerivedMetrics) -> u64) -> Vec<NamedValue> {
    countries
        .iter()
        .map(|c| NamedValue {
            name: c.axis_label(),
            value: i64::try_from(value(&c.metrics)).unwrap_or(i64::MAX),
        })
        .collect()
}

fn chart_id(prefix: &str, code: &str) -> String {
    format!("{prefix}-{}", chart_slug(code))
}

/// DOM-safe form of a country code: lowercase ASCII alphanumerics and dashes.
/// Codes sharing a slug would share a chart id.
pub fn chart_slug(code: &str) -> String {
    code.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
