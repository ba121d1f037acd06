//! CSV export host implementing DisplayPort.
//!
//! Writes the header and rows only. Page metadata and the caption have no
//! CSV representation, and cell styles are dropped.

use std::io::Write;

use crate::domain::error::CotError;
use crate::domain::presenter::{PageMeta, StyledTable};
use crate::ports::display_port::DisplayPort;

pub struct CsvDisplay<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(out),
        }
    }

    pub fn into_inner(self) -> Result<W, CotError> {
        self.writer
            .into_inner()
            .map_err(|e| CotError::Io(std::io::Error::other(e.to_string())))
    }
}

fn csv_error(e: csv::Error) -> CotError {
    CotError::Io(std::io::Error::other(format!("CSV write error: {e}")))
}

impl<W: Write> DisplayPort for CsvDisplay<W> {
    fn set_page(&mut self, _meta: &PageMeta) -> Result<(), CotError> {
        Ok(())
    }

    fn caption(&mut self, _text: &str) -> Result<(), CotError> {
        Ok(())
    }

    fn render_table(&mut self, table: &StyledTable) -> Result<(), CotError> {
        self.writer
            .write_record(&table.headers)
            .map_err(csv_error)?;
        for row in &table.rows {
            self.writer
                .write_record(row.iter().map(|c| c.text.as_str()))
                .map_err(csv_error)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
