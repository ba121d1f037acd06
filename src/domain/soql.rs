//! Query model for the remote tabular-dataset endpoint.
//!
//! The endpoint speaks a small SQL-like dialect: a `select` list, a `where`
//! predicate and a row `limit`, each passed as a separate request parameter.

use crate::domain::instrument::InstrumentFilter;

pub const REPORT_DATE_FIELD: &str = "report_date_as_yyyy_mm_dd";
pub const MAX_REPORT_DATE_KEY: &str = "max_report_date_as_yyyy_mm_dd";
pub const NAME_FIELD: &str = "commodity_name";
pub const LONG_FIELD: &str = "noncommercial_long_all";
pub const CHANGE_LONG_FIELD: &str = "change_in_noncommercial_long_all";
pub const SHORT_FIELD: &str = "noncommercial_short_all";
pub const CHANGE_SHORT_FIELD: &str = "change_in_noncommercial_short_all";

/// Fields requested for each instrument row, in request order.
pub const POSITION_FIELDS: [&str; 5] = [
    NAME_FIELD,
    LONG_FIELD,
    CHANGE_LONG_FIELD,
    SHORT_FIELD,
    CHANGE_SHORT_FIELD,
];

/// Page size of the remote endpoint when no limit is given.
pub const DEFAULT_LIMIT: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoqlQuery {
    pub select: Option<String>,
    pub where_clause: Option<String>,
    pub limit: Option<usize>,
}

impl SoqlQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn filter(mut self, predicate: impl Into<String>) -> Self {
        self.where_clause = Some(predicate.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when the select list is a single aggregate call such as `max(x)`.
    pub fn is_aggregate(&self) -> bool {
        self.select
            .as_deref()
            .map(|s| {
                let s = s.trim().to_ascii_lowercase();
                ["max(", "min(", "count(", "sum(", "avg("]
                    .iter()
                    .any(|f| s.starts_with(f))
                    && s.ends_with(')')
            })
            .unwrap_or(false)
    }

    /// Request parameters in the endpoint's `$name=value` form.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(select) = &self.select {
            params.push(("$select", select.clone()));
        }
        if let Some(predicate) = &self.where_clause {
            params.push(("$where", predicate.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("$limit", limit.to_string()));
        }
        params
    }
}

/// Single-quoted string literal with embedded quotes doubled.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn max_report_date_query() -> SoqlQuery {
    SoqlQuery::new().select(format!("max({REPORT_DATE_FIELD})"))
}

pub fn positions_query(report_date_raw: &str, instruments: &InstrumentFilter) -> SoqlQuery {
    let names = instruments
        .names()
        .iter()
        .map(|n| quote_literal(n))
        .collect::<Vec<_>>()
        .join(",");
    SoqlQuery::new()
        .select(POSITION_FIELDS.join(","))
        .filter(format!(
            "{REPORT_DATE_FIELD} = {} AND {NAME_FIELD} in ({names})",
            quote_literal(report_date_raw)
        ))
        .limit(DEFAULT_LIMIT)
}
