pub mod chart;
pub mod dashboard;
pub mod domain;
pub mod ingest;

pub mod config {
    use anyhow::Context;

    const DEFAULT_COVID_API_BASE_URL: &str = "https://api.covid19api.com";
    const DEFAULT_COVID_API_TIMEOUT_SECS: u64 = 15;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub covid_api_base_url: String,
        pub covid_api_timeout_secs: u64,
        pub sentry_dsn: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                covid_api_base_url: DEFAULT_COVID_API_BASE_URL.to_string(),
                covid_api_timeout_secs: DEFAULT_COVID_API_TIMEOUT_SECS,
                sentry_dsn: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let defaults = Self::default();

            let covid_api_base_url = std::env::var("COVID_API_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.covid_api_base_url);

            let covid_api_timeout_secs = match std::env::var("COVID_API_TIMEOUT_SECS") {
                Ok(s) => s
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("COVID_API_TIMEOUT_SECS must be an integer (got {s:?})"))?,
                Err(_) => defaults.covid_api_timeout_secs,
            };
            anyhow::ensure!(
                covid_api_timeout_secs > 0,
                "COVID_API_TIMEOUT_SECS must be > 0"
            );

            Ok(Self {
                covid_api_base_url,
                covid_api_timeout_secs,
                sentry_dsn: std::env::var("SENTRY_DSN").ok().filter(|s| !s.is_empty()),
            })
        }
    }
}
