//! HTTP error responses for the web host.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::adapters::html_adapter::ErrorPage;
use crate::domain::error::CotError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &CotError) -> StatusCode {
    match err {
        CotError::RemoteUnavailable { .. }
        | CotError::MalformedResponse { .. }
        | CotError::EmptyAggregate { .. } => StatusCode::BAD_GATEWAY,
        CotError::ConfigParse { .. }
        | CotError::ConfigInvalid { .. }
        | CotError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<CotError> for WebError {
    fn from(err: CotError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let page = ErrorPage {
            title: self.status.canonical_reason().unwrap_or("Error"),
            status: self.status.as_u16(),
            message: &self.message,
        };
        match page.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}
