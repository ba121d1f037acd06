#![allow(dead_code)]

use cotboard::domain::config::CotConfig;
use cotboard::domain::error::CotError;
use cotboard::domain::instrument::parse_instruments;
use cotboard::domain::soql::SoqlQuery;
use cotboard::ports::data_port::{DatasetPort, Record};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted dataset: one answer for the aggregate query, one for row queries.
pub struct MockDatasetPort {
    pub aggregate: Result<Vec<Record>, String>,
    pub positions: Result<Vec<Record>, String>,
    pub queries: Mutex<Vec<SoqlQuery>>,
    aggregate_calls: AtomicUsize,
    position_calls: AtomicUsize,
}

impl MockDatasetPort {
    pub fn new() -> Self {
        Self {
            aggregate: Ok(Vec::new()),
            positions: Ok(Vec::new()),
            queries: Mutex::new(Vec::new()),
            aggregate_calls: AtomicUsize::new(0),
            position_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_latest_date(mut self, raw: &str) -> Self {
        self.aggregate = Ok(vec![record(json!({ "max_report_date_as_yyyy_mm_dd": raw }))]);
        self
    }

    pub fn with_aggregate(mut self, records: Vec<Record>) -> Self {
        self.aggregate = Ok(records);
        self
    }

    pub fn with_positions(mut self, records: Vec<Record>) -> Self {
        self.positions = Ok(records);
        self
    }

    pub fn with_unreachable(mut self, reason: &str) -> Self {
        self.aggregate = Err(reason.to_string());
        self.positions = Err(reason.to_string());
        self
    }

    pub fn with_positions_error(mut self, reason: &str) -> Self {
        self.positions = Err(reason.to_string());
        self
    }

    pub fn aggregate_calls(&self) -> usize {
        self.aggregate_calls.load(Ordering::SeqCst)
    }

    pub fn position_calls(&self) -> usize {
        self.position_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.aggregate_calls() + self.position_calls()
    }

    pub fn recorded_queries(&self) -> Vec<SoqlQuery> {
        self.queries.lock().unwrap().clone()
    }
}

impl DatasetPort for MockDatasetPort {
    fn query(&self, _dataset: &str, query: &SoqlQuery) -> Result<Vec<Record>, CotError> {
        self.queries.lock().unwrap().push(query.clone());
        let answer = if query.is_aggregate() {
            self.aggregate_calls.fetch_add(1, Ordering::SeqCst);
            &self.aggregate
        } else {
            self.position_calls.fetch_add(1, Ordering::SeqCst);
            &self.positions
        };
        answer
            .clone()
            .map_err(|reason| CotError::RemoteUnavailable { reason })
    }
}

pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

pub fn position(name: &str, long: &str, change_long: &str, short: &str, change_short: &str) -> Record {
    record(json!({
        "commodity_name": name,
        "noncommercial_long_all": long,
        "change_in_noncommercial_long_all": change_long,
        "noncommercial_short_all": short,
        "change_in_noncommercial_short_all": change_short,
    }))
}

pub fn gold_record() -> Record {
    position("GOLD", "120000", "-500", "30000", "200")
}

/// Port answering for 2024-05-14 with a single GOLD row.
pub fn gold_port() -> MockDatasetPort {
    MockDatasetPort::new()
        .with_latest_date("2024-05-14T00:00:00.000")
        .with_positions(vec![gold_record()])
}

pub fn metals_config() -> CotConfig {
    CotConfig {
        instruments: parse_instruments("GOLD,SILVER").unwrap(),
        ..CotConfig::default()
    }
}
