//! Open-data API adapter implementing DatasetPort.
//!
//! Anonymous read access over HTTPS: `GET <base>/resource/<dataset>.json`
//! with `$select`, `$where` and `$limit` parameters, answered by a JSON
//! array of flat objects.

use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::domain::config::CotConfig;
use crate::domain::error::CotError;
use crate::domain::soql::SoqlQuery;
use crate::ports::data_port::{DatasetPort, Record};

pub struct SocrataAdapter {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl SocrataAdapter {
    /// Must be called outside of an async runtime: the blocking client owns one.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CotError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cotboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CotError::RemoteUnavailable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &CotConfig) -> Result<Self, CotError> {
        Self::new(&config.base_url(), config.request_timeout)
    }

    pub fn resource_url(&self, dataset: &str) -> String {
        format!("{}/resource/{}.json", self.base_url, dataset)
    }
}

impl DatasetPort for SocrataAdapter {
    fn query(&self, dataset: &str, query: &SoqlQuery) -> Result<Vec<Record>, CotError> {
        let url = self.resource_url(dataset);
        let params = query.params();
        debug!("GET {url} {params:?}");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&params)
            .send()
            .map_err(|e| CotError::RemoteUnavailable {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CotError::RemoteUnavailable {
                reason: format!("{url} returned {status}: {}", error_message(&body)),
            });
        }

        let body = response.text().map_err(|e| CotError::RemoteUnavailable {
            reason: format!("failed to read response body: {e}"),
        })?;
        parse_records(&body)
    }
}

/// Decode a response body as an array of objects.
pub fn parse_records(body: &str) -> Result<Vec<Record>, CotError> {
    let value: Value = serde_json::from_str(body).map_err(|e| CotError::MalformedResponse {
        reason: format!("invalid JSON: {e}"),
    })?;
    let Value::Array(items) = value else {
        return Err(CotError::MalformedResponse {
            reason: "expected a JSON array of records".to_string(),
        });
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(CotError::MalformedResponse {
                reason: format!("record {i} is not an object: {other}"),
            }),
        })
        .collect()
}

// Error bodies look like {"error": true, "message": "..."}; fall back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
