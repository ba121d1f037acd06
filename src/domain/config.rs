//! Process-wide settings for the report loader and its display hosts.
//!
//! Every field has a built-in default; an optional INI file read through
//! [`ConfigPort`] may override any of them.

use std::time::Duration;

use crate::domain::error::CotError;
use crate::domain::instrument::{parse_instruments, InstrumentFilter};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_DOMAIN: &str = "publicreporting.cftc.gov";
pub const DEFAULT_DATASET: &str = "6dca-aqww";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TITLE: &str = "COT Non-Commercial Positioning";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CotConfig {
    /// Host of the dataset API, optionally with an explicit scheme.
    pub domain: String,
    pub dataset: String,
    pub instruments: InstrumentFilter,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    pub page_title: String,
    pub listen: String,
    pub color: bool,
}

impl Default for CotConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            instruments: InstrumentFilter::default(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_title: DEFAULT_TITLE.to_string(),
            listen: DEFAULT_LISTEN.to_string(),
            color: true,
        }
    }
}

impl CotConfig {
    /// Build from overrides, falling back to defaults for absent keys.
    pub fn from_config_port(config: &dyn ConfigPort) -> Result<Self, CotError> {
        let defaults = Self::default();

        let domain = config
            .get_string("source", "domain")
            .map(|s| s.trim().to_string())
            .unwrap_or(defaults.domain);
        if domain.is_empty() {
            return Err(CotError::config_invalid("source", "domain", "domain must not be empty"));
        }

        let dataset = config
            .get_string("source", "dataset")
            .map(|s| s.trim().to_string())
            .unwrap_or(defaults.dataset);
        if dataset.is_empty() {
            return Err(CotError::config_invalid("source", "dataset", "dataset must not be empty"));
        }

        let timeout_secs = config.get_int("source", "timeout_secs", DEFAULT_TIMEOUT_SECS as i64);
        if timeout_secs <= 0 {
            return Err(CotError::config_invalid(
                "source",
                "timeout_secs",
                "timeout_secs must be positive",
            ));
        }

        let instruments = match config.get_string("report", "instruments") {
            Some(list) => parse_instruments(&list)
                .map_err(|e| CotError::config_invalid("report", "instruments", e.to_string()))?,
            None => defaults.instruments,
        };

        let ttl_secs = config.get_int("cache", "ttl_secs", DEFAULT_CACHE_TTL_SECS as i64);
        if ttl_secs <= 0 {
            return Err(CotError::config_invalid(
                "cache",
                "ttl_secs",
                "ttl_secs must be positive",
            ));
        }

        let page_title = config
            .get_string("report", "title")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.page_title);

        let listen = config
            .get_string("web", "listen")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.listen);

        Ok(Self {
            domain,
            dataset,
            instruments,
            cache_ttl: Duration::from_secs(ttl_secs as u64),
            request_timeout: Duration::from_secs(timeout_secs as u64),
            page_title,
            listen,
            color: config.get_bool("display", "color", defaults.color),
        })
    }

    /// Base URL of the API, `https://` unless the domain names a scheme.
    pub fn base_url(&self) -> String {
        let domain = self.domain.trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        }
    }
}
