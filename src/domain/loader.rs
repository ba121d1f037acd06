//! Latest-report loader.
//!
//! Two round trips to the dataset: an aggregate query for the newest report
//! date, then the filtered position rows for that date. Rows for instruments
//! outside the filter are dropped. Numeric cells that do not parse are degraded
//! to nulls; anything structurally wrong with the response fails the whole load.

use log::debug;
use serde_json::Value;

use crate::domain::config::CotConfig;
use crate::domain::error::CotError;
use crate::domain::report::{PositionRow, ReportDate, ReportSnapshot, ReportTable};
use crate::domain::soql::{self, MAX_REPORT_DATE_KEY};
use crate::ports::data_port::{DatasetPort, Record};

/// A numeric cell that could not be read as a count.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field {field}: cannot read {value} as a count")]
pub struct MalformedCell {
    pub field: &'static str,
    pub value: String,
}

pub fn load_latest_report(
    port: &dyn DatasetPort,
    config: &CotConfig,
) -> Result<ReportSnapshot, CotError> {
    let report_date = latest_report_date(port, &config.dataset)?;
    debug!("latest report date {} (raw {:?})", report_date, report_date.raw);

    let query = soql::positions_query(&report_date.raw, &config.instruments);
    let records = port.query(&config.dataset, &query)?;
    debug!("received {} position records", records.len());

    let mut rows = records
        .iter()
        .map(position_row)
        .collect::<Result<Vec<_>, _>>()?;
    rows.retain(|row| {
        let wanted = config.instruments.contains(&row.instrument);
        if !wanted {
            debug!("dropping {} row: not in the instrument filter", row.instrument);
        }
        wanted
    });

    Ok(ReportSnapshot {
        report_date,
        table: ReportTable::from_positions(rows),
    })
}

pub fn latest_report_date(port: &dyn DatasetPort, dataset: &str) -> Result<ReportDate, CotError> {
    let records = port.query(dataset, &soql::max_report_date_query())?;
    let value = records
        .first()
        .and_then(|r| r.get(MAX_REPORT_DATE_KEY))
        .filter(|v| !v.is_null())
        .ok_or_else(|| CotError::EmptyAggregate {
            dataset: dataset.to_string(),
        })?;
    let raw = value.as_str().ok_or_else(|| CotError::MalformedResponse {
        reason: format!("{MAX_REPORT_DATE_KEY} is not a string: {value}"),
    })?;
    ReportDate::parse(raw).ok_or_else(|| CotError::MalformedResponse {
        reason: format!("unrecognised report date {raw:?}"),
    })
}

fn position_row(record: &Record) -> Result<PositionRow, CotError> {
    let instrument = record
        .get(soql::NAME_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| CotError::MalformedResponse {
            reason: format!("record without {}", soql::NAME_FIELD),
        })?
        .to_string();

    Ok(PositionRow {
        long: coerce(record, soql::LONG_FIELD, &instrument),
        change_long: coerce(record, soql::CHANGE_LONG_FIELD, &instrument),
        short: coerce(record, soql::SHORT_FIELD, &instrument),
        change_short: coerce(record, soql::CHANGE_SHORT_FIELD, &instrument),
        instrument,
    })
}

fn coerce(record: &Record, field: &'static str, instrument: &str) -> Option<i64> {
    match parse_count(field, record.get(field)) {
        Ok(v) => v,
        Err(e) => {
            debug!("{instrument}: {e}, treating as null");
            None
        }
    }
}

/// Read a count from a string or number cell. Missing and null cells are
/// `Ok(None)`; anything else that is not an integral value is malformed.
pub fn parse_count(field: &'static str, value: Option<&Value>) -> Result<Option<i64>, MalformedCell> {
    let Some(v) = value else {
        return Ok(None);
    };
    let parsed = match v {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    };
    parsed.map(Some).ok_or_else(|| MalformedCell {
        field,
        value: v.to_string(),
    })
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        Some(f as i64)
    } else {
        None
    }
}
