use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use vacancy_stats::error::AppError;
use vacancy_stats::loader::{collapse_whitespace, VacancyCsvLoader};
use vacancy_stats::report::{render_html, HtmlReportRenderer, StatisticsReport};
use vacancy_stats::statistics::{CurrencyTable, VacancyStatistics};

#[derive(Debug, Deserialize)]
pub(crate) struct StatisticsRequest {
    /// Vacancy export in the same CSV layout the CLI reads.
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) profession: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatisticsResponse {
    #[serde(flatten)]
    pub(crate) statistics: VacancyStatistics,
    pub(crate) city_keys_aligned: bool,
}

pub(crate) fn statistics_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/statistics", post(statistics_endpoint))
        .route("/api/v1/statistics/report", post(statistics_report_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn compute(
    currencies: &CurrencyTable,
    request: StatisticsRequest,
) -> Result<VacancyStatistics, AppError> {
    let profession = collapse_whitespace(&request.profession);
    let records = VacancyCsvLoader::from_reader(Cursor::new(request.csv.into_bytes()))?;
    let statistics = VacancyStatistics::compute(&records, &profession, currencies)?;
    statistics.ensure_not_empty()?;
    Ok(statistics)
}

/// Parses and aggregates on the blocking pool; exports can hold many thousands of rows.
async fn compute_blocking(
    state: &AppState,
    request: StatisticsRequest,
) -> Result<VacancyStatistics, AppError> {
    let currencies = Arc::clone(&state.currencies);
    tokio::task::spawn_blocking(move || compute(&currencies, request))
        .await
        .map_err(|err| AppError::Io(std::io::Error::other(err)))?
}

pub(crate) async fn statistics_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<StatisticsRequest>,
) -> Result<Json<StatisticsResponse>, AppError> {
    let statistics = compute_blocking(&state, payload).await?;
    let city_keys_aligned = statistics.city_keys_aligned();

    Ok(Json(StatisticsResponse {
        statistics,
        city_keys_aligned,
    }))
}

pub(crate) async fn statistics_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<StatisticsRequest>,
) -> Result<Html<String>, AppError> {
    let statistics = compute_blocking(&state, payload).await?;
    let report = StatisticsReport::from_statistics(&statistics);
    let (html, report) = tokio::task::spawn_blocking(move || {
        let renderer = HtmlReportRenderer::new()?;
        let (html, _chart) = render_html(&renderer, &report)?;
        Ok::<_, AppError>((html, report))
    })
    .await
    .map_err(|err| AppError::Io(std::io::Error::other(err)))??;

    info!(
        profession = %report.profession,
        records = report.total_records,
        "rendered statistics report"
    );

    Ok(Html(html))
}
