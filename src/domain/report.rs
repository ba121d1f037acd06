//! Positioning report model: raw rows, derived net columns and the display table.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Date stamp of a weekly report.
///
/// `raw` is the value exactly as the remote source returned it, so it can be
/// echoed back into a follow-up query without reformatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDate {
    pub date: NaiveDate,
    pub raw: String,
}

impl ReportDate {
    /// Accepts `YYYY-MM-DD` or a floating timestamp `YYYY-MM-DDTHH:MM:SS[.fff]`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|dt| dt.date())
            })?;
        Some(Self {
            date,
            raw: raw.to_string(),
        })
    }
}

impl fmt::Display for ReportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

// Serialized as the display form; the raw value only matters for querying.
impl Serialize for ReportDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One instrument's non-commercial position counts as reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionRow {
    pub instrument: String,
    pub long: Option<i64>,
    pub change_long: Option<i64>,
    pub short: Option<i64>,
    pub change_short: Option<i64>,
}

/// A position row plus the net columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedRow {
    pub instrument: String,
    pub net_positions: Option<i64>,
    pub net_change: Option<i64>,
    pub long: Option<i64>,
    pub change_long: Option<i64>,
    pub short: Option<i64>,
    pub change_short: Option<i64>,
}

/// `a - b`, null if either side is null or the result overflows.
pub fn net(a: Option<i64>, b: Option<i64>) -> Option<i64> {
    a?.checked_sub(b?)
}

impl From<PositionRow> for DerivedRow {
    fn from(row: PositionRow) -> Self {
        Self {
            net_positions: net(row.long, row.short),
            net_change: net(row.change_long, row.change_short),
            instrument: row.instrument,
            long: row.long,
            change_long: row.change_long,
            short: row.short,
            change_short: row.change_short,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Instrument,
    NetPositions,
    NetChange,
    LongPositions,
    ChangeLong,
    ShortPositions,
    ChangeShort,
}

impl Column {
    /// Display order.
    pub const ALL: [Column; 7] = [
        Column::Instrument,
        Column::NetPositions,
        Column::NetChange,
        Column::LongPositions,
        Column::ChangeLong,
        Column::ShortPositions,
        Column::ChangeShort,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Instrument => "Instrument",
            Column::NetPositions => "Net Positions",
            Column::NetChange => "Net Change",
            Column::LongPositions => "Long Positions",
            Column::ChangeLong => "Change (Long)",
            Column::ShortPositions => "Short Positions",
            Column::ChangeShort => "Change (Short)",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Column::Instrument)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell<'a> {
    Text(&'a str),
    Count(Option<i64>),
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Count(Some(v)) => write!(f, "{v}"),
            Cell::Count(None) => Ok(()),
        }
    }
}

impl DerivedRow {
    pub fn cell(&self, column: Column) -> Cell<'_> {
        match column {
            Column::Instrument => Cell::Text(&self.instrument),
            Column::NetPositions => Cell::Count(self.net_positions),
            Column::NetChange => Cell::Count(self.net_change),
            Column::LongPositions => Cell::Count(self.long),
            Column::ChangeLong => Cell::Count(self.change_long),
            Column::ShortPositions => Cell::Count(self.short),
            Column::ChangeShort => Cell::Count(self.change_short),
        }
    }
}

/// Derived rows in the order the remote source returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReportTable {
    pub rows: Vec<DerivedRow>,
}

impl ReportTable {
    pub fn from_positions(rows: Vec<PositionRow>) -> Self {
        Self {
            rows: rows.into_iter().map(DerivedRow::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The table for the most recent report date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSnapshot {
    pub report_date: ReportDate,
    pub table: ReportTable,
}
