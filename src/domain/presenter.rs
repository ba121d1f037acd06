//! Presenter: turns a report snapshot into a captioned, styled table and
//! hands it to a display host.

use crate::domain::error::CotError;
use crate::domain::report::{Column, ReportDate, ReportSnapshot, ReportTable};
use crate::domain::style::{style, CellStyle};
use crate::ports::display_port::DisplayPort;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    /// Fill the host's full width.
    pub wide: bool,
}

impl PageMeta {
    pub fn wide(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            wide: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledCell {
    pub text: String,
    pub style: CellStyle,
    pub numeric: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<StyledCell>>,
}

impl StyledTable {
    /// Every cell neutral except the net-change column, which is coloured by sign.
    pub fn from_report(table: &ReportTable) -> Self {
        let headers = Column::ALL.iter().map(|c| c.header()).collect();
        let rows = table
            .rows
            .iter()
            .map(|row| {
                Column::ALL
                    .iter()
                    .map(|&column| StyledCell {
                        text: row.cell(column).to_string(),
                        style: if column == Column::NetChange {
                            style(row.net_change)
                        } else {
                            CellStyle::Neutral
                        },
                        numeric: column.is_numeric(),
                    })
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }
}

pub fn caption(report_date: &ReportDate) -> String {
    format!("Latest CFTC Report: {report_date}")
}

/// Page metadata, then caption, then the table.
pub fn render(
    snapshot: &ReportSnapshot,
    meta: &PageMeta,
    display: &mut dyn DisplayPort,
) -> Result<(), CotError> {
    display.set_page(meta)?;
    display.caption(&caption(&snapshot.report_date))?;
    display.render_table(&StyledTable::from_report(&snapshot.table))
}
