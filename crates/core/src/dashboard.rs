//! Fetch → derive → build orchestration for both dashboard endpoints.
//!
//! Countries are processed one at a time in request order.

use crate::chart::builder::{
    build_aggregate_charts, build_country_chart, chart_slug, CountrySummary,
};
use crate::chart::description::Page;
use crate::domain::metrics::derive;
use crate::domain::series::normalize_country_code;
use crate::ingest::error::FetchError;
use crate::ingest::provider::DayOneSource;

pub const COUNTRY_PAGE_TITLE: &str = "COVID country dashboard";
pub const COMPARISON_PAGE_TITLE: &str = "COVID comparison dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Fetch(FetchError),
    NoRecords,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCountry {
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct ComparisonDashboard {
    pub page: Page,
    pub included: Vec<CountrySummary>,
    pub skipped: Vec<SkippedCountry>,
}

/// Splits a whitespace-separated list, normalizing codes and dropping repeats.
/// Codes that map to the same chart slug (`a.b`, `a-b`) count as repeats.
pub fn parse_country_list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut slugs: Vec<String> = Vec::new();
    for code in raw.split_whitespace().map(normalize_country_code) {
        let slug = chart_slug(&code);
        if !slugs.contains(&slug) {
            slugs.push(slug);
            out.push(code);
        }
    }
    out
}

/// Single-country page. `Ok(None)` when upstream has no records for the code.
pub async fn build_country_page(
    source: &dyn DayOneSource,
    country_code: &str,
) -> Result<Option<Page>, FetchError> {
    let series = source.fetch_day_one(country_code).await?;
    if series.is_empty() {
        return Ok(None);
    }

    let metrics = derive(&series);
    Ok(Some(Page {
        title: COUNTRY_PAGE_TITLE.to_string(),
        charts: vec![build_country_chart(&series, &metrics)],
    }))
}

/// Multi-country page. Failing or empty countries are logged and skipped; the
/// page (per-country charts, then scatter and pie) is always produced.
pub async fn build_comparison_page(
    source: &dyn DayOneSource,
    country_codes: &[String],
) -> ComparisonDashboard {
    let mut charts = Vec::with_capacity(country_codes.len() + 2);
    let mut included = Vec::with_capacity(country_codes.len());
    let mut skipped = Vec::new();

    for code in country_codes {
        let series = match source.fetch_day_one(code).await {
            Ok(series) => series,
            Err(err) => {
                tracing::warn!(
                    country_code = %code,
                    source = source.source_name(),
                    kind = err.kind(),
                    error = %err,
                    "skipping country"
                );
                skipped.push(SkippedCountry {
                    code: code.clone(),
                    reason: SkipReason::Fetch(err),
                });
                continue;
            }
        };

        if series.is_empty() {
            tracing::warn!(country_code = %code, "no records upstream; skipping country");
            skipped.push(SkippedCountry {
                code: code.clone(),
                reason: SkipReason::NoRecords,
            });
            continue;
        }

        let metrics = derive(&series);
        charts.push(build_country_chart(&series, &metrics));
        included.push(CountrySummary::new(&series, metrics));
    }

    let (scatter, pie) = build_aggregate_charts(&included);
    charts.push(scatter);
    charts.push(pie);

    tracing::info!(
        requested = country_codes.len(),
        included = included.len(),
        skipped = skipped.len(),
        "built comparison dashboard"
    );

    ComparisonDashboard {
        page: Page {
            title: COMPARISON_PAGE_TITLE.to_string(),
            charts,
        },
        included,
        skipped,
    }
}
