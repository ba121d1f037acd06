//! Web dashboard host.
//!
//! Serves the latest report as an HTML page that re-polls its content
//! fragment with htmx, plus CSV and JSON downloads. All requests share one
//! [`CachedLoader`], so any number of viewers cause at most one upstream
//! fetch per cache window.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::domain::cache::CachedLoader;

/// Fragment re-poll interval for open dashboards.
pub const REFRESH_SECS: u64 = 300;

pub struct AppState {
    pub loader: Arc<CachedLoader>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/report.csv", get(handlers::report_csv))
        .route("/report.json", get(handlers::report_json))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
