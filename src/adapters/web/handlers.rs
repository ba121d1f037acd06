//! HTTP request handlers for the web host.

use axum::{
    extract::State,
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Json, Response},
};
use log::error;
use std::sync::Arc;

use crate::adapters::csv_adapter::CsvDisplay;
use crate::adapters::html_adapter::HtmlDisplay;
use crate::domain::presenter::{PageMeta, render};
use crate::domain::report::ReportSnapshot;

use super::{AppState, REFRESH_SECS, WebError, is_htmx_request};

async fn load_snapshot(state: &AppState) -> Result<Arc<ReportSnapshot>, WebError> {
    let loader = Arc::clone(&state.loader);
    tokio::task::spawn_blocking(move || loader.load())
        .await
        .map_err(|e| WebError::internal(format!("report loader task failed: {e}")))?
        .map_err(|e| {
            error!("report load failed: {e}");
            WebError::from(e)
        })
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let snapshot = load_snapshot(&state).await?;
    let meta = PageMeta::wide(state.loader.config().page_title.clone());

    let mut display = HtmlDisplay::new().with_refresh("/", REFRESH_SECS);
    render(&snapshot, &meta, &mut display)?;

    if is_htmx_request(&headers) {
        Ok(Html(display.fragment()?).into_response())
    } else {
        Ok(Html(display.into_html()?).into_response())
    }
}

pub async fn report_csv(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let snapshot = load_snapshot(&state).await?;
    let meta = PageMeta::wide(state.loader.config().page_title.clone());

    let mut display = CsvDisplay::new(Vec::new());
    render(&snapshot, &meta, &mut display)?;
    let body = display.into_inner()?;

    let disposition = format!(
        "attachment; filename=\"cot-{}.csv\"",
        snapshot.report_date
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub async fn report_json(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let snapshot = load_snapshot(&state).await?;
    Ok(Json(snapshot.as_ref()).into_response())
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
