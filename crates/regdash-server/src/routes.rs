use crate::error::ApiError;
use crate::query::{NaiveBounds, WindowQuery};
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use regdash_core::trend::DEFAULT_TREND_WINDOWS;
use regdash_core::{
    Aggregator, IngestHandler, RunView, TrendBuilder, TrendPoint, Window, WindowChoice,
    WindowSummary,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const ADDED_HEADER: &str = "x-regdash-added";
pub const UPDATED_HEADER: &str = "x-regdash-updated";

/// Run store work off the async executor.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("worker join failed: {e}")))?
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    Query(q): Query<WindowQuery>,
) -> Result<Json<WindowSummary>, ApiError> {
    let window = q.window(&state.resolver, state.now(), NaiveBounds::Utc)?;
    let summary = blocking(move || {
        Ok(Aggregator::new(&state.store).summary_filtered(&window, &q.filter())?)
    })
    .await?;
    Ok(Json(summary))
}

pub async fn failures(
    State(state): State<Arc<AppState>>,
    Query(q): Query<WindowQuery>,
) -> Result<Json<BTreeMap<String, Vec<RunView>>>, ApiError> {
    let window = q.window(&state.resolver, state.now(), NaiveBounds::Utc)?;
    let grouped = blocking(move || {
        let grouped = Aggregator::new(&state.store).failures_by_reason(&window)?;
        Ok(grouped
            .into_iter()
            .map(|(reason, runs)| {
                let views: Vec<RunView> = runs.into_iter().map(|r| state.config.view(r)).collect();
                (reason, views)
            })
            .collect())
    })
    .await?;
    Ok(Json(grouped))
}

pub async fn runs(
    State(state): State<Arc<AppState>>,
    Query(q): Query<WindowQuery>,
) -> Result<Json<Vec<RunView>>, ApiError> {
    let window = q.window(&state.resolver, state.now(), NaiveBounds::Utc)?;
    let views = blocking(move || list_views(&state, &window, &q)).await?;
    Ok(Json(views))
}

pub async fn by_cloud(
    State(state): State<Arc<AppState>>,
    Query(q): Query<WindowQuery>,
) -> Result<Json<BTreeMap<String, BTreeMap<String, u64>>>, ApiError> {
    let window = q.window(&state.resolver, state.now(), NaiveBounds::Utc)?;
    let counts = blocking(move || Ok(Aggregator::new(&state.store).by_cloud(&window)?)).await?;
    Ok(Json(counts))
}

#[derive(Debug, Serialize)]
pub struct WindowList {
    pub windows: Vec<WindowChoice>,
}

pub async fn windows(State(state): State<Arc<AppState>>) -> Result<Json<WindowList>, ApiError> {
    Ok(Json(WindowList {
        windows: state.resolver.recent(state.now())?,
    }))
}

pub async fn cloud_trend(
    State(state): State<Arc<AppState>>,
    Query(q): Query<WindowQuery>,
) -> Result<Json<BTreeMap<String, Vec<TrendPoint>>>, ApiError> {
    let k = q.trend_windows(DEFAULT_TREND_WINDOWS)?;
    let now = state.now();
    let trends = blocking(move || {
        Ok(TrendBuilder::new(&state.store, state.resolver).cloud_trends(
            &state.config.monitored_clouds,
            k,
            now,
        )?)
    })
    .await?;
    Ok(Json(trends))
}

#[derive(Debug, Serialize)]
pub struct DetailsPage {
    pub label: String,
    pub range_label: String,
    pub window: Window,
    pub windows: Vec<WindowChoice>,
    pub runs: Vec<RunView>,
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    Query(q): Query<WindowQuery>,
) -> Result<Json<DetailsPage>, ApiError> {
    let now = state.now();
    let window = q.window(&state.resolver, now, NaiveBounds::Lab)?;
    let windows = state.resolver.recent(now)?;
    let runs = blocking(move || list_views(&state, &window, &q)).await?;
    Ok(Json(DetailsPage {
        label: window.label(),
        range_label: window.range_label(),
        window,
        windows,
        runs,
    }))
}

pub async fn ingest_json(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Response, ApiError> {
    let report = blocking(move || {
        Ok(IngestHandler::new(&state.store, state.resolver).ingest_json(&body)?)
    })
    .await?;

    let mut resp = (StatusCode::SEE_OTHER, [(header::LOCATION, "/details")]).into_response();
    let headers = resp.headers_mut();
    headers.insert(ADDED_HEADER, HeaderValue::from(report.added));
    headers.insert(UPDATED_HEADER, HeaderValue::from(report.updated));
    Ok(resp)
}

fn list_views(state: &AppState, window: &Window, q: &WindowQuery) -> Result<Vec<RunView>, ApiError> {
    let runs = Aggregator::new(&state.store).list_runs(window, &q.filter())?;
    Ok(runs.into_iter().map(|r| state.config.view(r)).collect())
}
