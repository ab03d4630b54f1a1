use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use clap::Parser;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coviddash_core::chart::description::Page;
use coviddash_core::chart::render::render_page_string;
use coviddash_core::dashboard::{build_comparison_page, build_country_page, parse_country_list};
use coviddash_core::domain::series::normalize_country_code;
use coviddash_core::ingest::provider::{Covid19ApiClient, DayOneSource};

const DEFAULT_PORT: u16 = 4040;

#[derive(Debug, Parser)]
#[command(name = "coviddash_api")]
struct Args {
    /// Port number the server should listen on.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let settings = coviddash_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let source = Covid19ApiClient::from_settings(&settings)?;
    tracing::info!(
        source = source.source_name(),
        base_url = %settings.covid_api_base_url,
        timeout_secs = settings.covid_api_timeout_secs,
        "upstream configured"
    );

    let state = AppState {
        source: Arc::new(source),
    };

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/country/:code", get(get_country))
        .route("/countries", get(get_countries))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    source: Arc<dyn DayOneSource>,
}

#[derive(Debug, Deserialize)]
struct CountriesQuery {
    #[serde(default)]
    countries: String,
}

async fn get_country(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    match build_country_page(state.source.as_ref(), &code).await {
        Ok(Some(page)) => html_response(&page),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            format!(
                "No records for country code {}",
                normalize_country_code(&code)
            ),
        )
            .into_response(),
        Err(err) => {
            tracing::warn!(country_code = %err.country_code(), kind = err.kind(), error = %err, "country fetch failed");
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
    }
}

async fn get_countries(
    State(state): State<AppState>,
    Query(query): Query<CountriesQuery>,
) -> Response {
    let codes = parse_country_list(&query.countries);
    let dashboard = build_comparison_page(state.source.as_ref(), &codes).await;
    html_response(&dashboard.page)
}

fn html_response(page: &Page) -> Response {
    match render_page_string(page) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "page render failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &coviddash_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
