use crate::config::Settings;
use crate::domain::series::{normalize_country_code, CountrySeries, DailyRecord};
use crate::ingest::error::FetchError;
use crate::ingest::types::DayOneResponse;
use anyhow::Context;
use reqwest::Url;
use std::time::Duration;

const DAY_ONE_PATH: [&str; 3] = ["total", "dayone", "country"];

#[async_trait::async_trait]
pub trait DayOneSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// Fetches the day-one series for `country_code` (case-insensitive).
    /// An empty upstream array is returned as an empty series, not an error.
    async fn fetch_day_one(&self, country_code: &str) -> Result<CountrySeries, FetchError>;
}

#[derive(Debug, Clone)]
pub struct Covid19ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl Covid19ApiClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(
            &settings.covid_api_base_url,
            Duration::from_secs(settings.covid_api_timeout_secs),
        )
    }

    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid COVID API base url: {base_url}"))?;
        anyhow::ensure!(
            !base_url.cannot_be_a_base(),
            "COVID API base url cannot be a base: {base_url}"
        );

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build COVID API http client")?;

        Ok(Self { http, base_url })
    }

    fn url(&self, country_code: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(DAY_ONE_PATH).push(country_code);
        }
        url
    }
}

#[async_trait::async_trait]
impl DayOneSource for Covid19ApiClient {
    fn source_name(&self) -> &'static str {
        "covid19api"
    }

    async fn fetch_day_one(&self, country_code: &str) -> Result<CountrySeries, FetchError> {
        let code = normalize_country_code(country_code);
        if code.is_empty() {
            return Err(FetchError::retrieval(&code, "country code must be non-empty"));
        }

        let url = self.url(&code);
        tracing::debug!(country_code = %code, %url, "fetching day-one series");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::retrieval(&code, e))?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::retrieval(&code, format!("HTTP {status}")));
        }

        let text = res
            .text()
            .await
            .map_err(|e| FetchError::retrieval(&code, format!("HTTP {status}, {e}")))?;

        let parsed = serde_json::from_str::<DayOneResponse>(&text)
            .map_err(|e| FetchError::parsing(&code, format!("HTTP {status}, {e}")))?;

        let records: Vec<DailyRecord> = parsed.into_iter().map(DailyRecord::from).collect();
        tracing::debug!(country_code = %code, records = records.len(), "fetched day-one series");
        Ok(CountrySeries::new(code, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode, routing::get, Router};
    use chrono::NaiveDate;
    use serde_json::json;

    async fn day_one(Path(code): Path<String>) -> (StatusCode, String) {
        match code.as_str() {
            "gb" => (
                StatusCode::OK,
                json!([
                    {
                        "Country": "United Kingdom",
                        "CountryCode": "GB",
                        "Province": "",
                        "City": "",
                        "CityCode": "",
                        "Lat": "0",
                        "Lon": "0",
                        "Confirmed": 2,
                        "Deaths": 0,
                        "Recovered": 0,
                        "Active": 2,
                        "Date": "2020-01-31T00:00:00Z"
                    },
                    {
                        "Country": "United Kingdom",
                        "CountryCode": "GB",
                        "Province": "",
                        "City": "",
                        "CityCode": "",
                        "Lat": "0",
                        "Lon": "0",
                        "Confirmed": 8,
                        "Deaths": 1,
                        "Recovered": 0,
                        "Active": 7,
                        "Date": "2020-02-01T00:00:00Z"
                    }
                ])
                .to_string(),
            ),
            "empty" => (StatusCode::OK, "[]".to_string()),
            "garbage" => (StatusCode::OK, "{\"message\":\"not an array\"}".to_string()),
            _ => (StatusCode::NOT_FOUND, "{}".to_string()),
        }
    }

    async fn spawn_upstream() -> String {
        let app = Router::new().route("/total/dayone/country/:code", get(day_one));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base_url: &str) -> Covid19ApiClient {
        Covid19ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn builds_day_one_url_with_and_without_trailing_slash() {
        let a = client("https://api.example.test");
        let b = client("https://api.example.test/");
        assert_eq!(
            a.url("gb").as_str(),
            "https://api.example.test/total/dayone/country/gb"
        );
        assert_eq!(a.url("gb"), b.url("gb"));
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(Covid19ApiClient::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn fetches_and_converts_records() {
        let base = spawn_upstream().await;
        let series = client(&base).fetch_day_one(" GB ").await.unwrap();
        assert_eq!(series.code, "gb");
        assert_eq!(series.len(), 2);
        assert_eq!(series.country_name(), "United Kingdom");
        assert_eq!(
            series.records[1].date,
            NaiveDate::from_ymd_opt(2020, 2, 1).unwrap()
        );
        assert_eq!(series.records[1].deaths, 1);
    }

    #[tokio::test]
    async fn empty_array_is_an_empty_series() {
        let base = spawn_upstream().await;
        let series = client(&base).fetch_day_one("empty").await.unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_a_retrieval_error() {
        let base = spawn_upstream().await;
        let err = client(&base).fetch_day_one("XX").await.unwrap_err();
        assert!(matches!(err, FetchError::Retrieval { .. }));
        assert_eq!(err.country_code(), "xx");
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn unexpected_shape_is_a_parsing_error() {
        let base = spawn_upstream().await;
        let err = client(&base).fetch_day_one("garbage").await.unwrap_err();
        assert!(matches!(err, FetchError::Parsing { .. }));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_retrieval_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}"))
            .fetch_day_one("gb")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Retrieval { .. }));
    }

    #[tokio::test]
    async fn blank_code_is_rejected_without_a_request() {
        let err = client("http://127.0.0.1:9").fetch_day_one("   ").await.unwrap_err();
        assert!(matches!(err, FetchError::Retrieval { .. }));
    }
}
