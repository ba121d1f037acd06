//! Plain-text display host: an aligned table written to any `Write`.

use std::io::Write;

use crate::domain::error::CotError;
use crate::domain::presenter::{PageMeta, StyledCell, StyledTable};
use crate::ports::display_port::DisplayPort;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

pub struct TerminalDisplay<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, sgr: &str) -> String {
        if self.color && !sgr.is_empty() {
            format!("{sgr}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

fn pad(cell: &StyledCell, width: usize) -> String {
    if cell.numeric {
        format!("{:>width$}", cell.text)
    } else {
        format!("{:<width$}", cell.text)
    }
}

fn column_widths(table: &StyledTable) -> Vec<usize> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            table
                .rows
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.text.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect()
}

impl<W: Write> DisplayPort for TerminalDisplay<W> {
    fn set_page(&mut self, meta: &PageMeta) -> Result<(), CotError> {
        let title = self.paint(&meta.title, BOLD);
        writeln!(self.out, "{title}")?;
        Ok(())
    }

    fn caption(&mut self, text: &str) -> Result<(), CotError> {
        writeln!(self.out, "{text}")?;
        writeln!(self.out)?;
        Ok(())
    }

    fn render_table(&mut self, table: &StyledTable) -> Result<(), CotError> {
        let widths = column_widths(table);

        let header = table
            .headers
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (h, &w))| {
                // Header alignment follows the column's data.
                if i == 0 {
                    format!("{h:<w$}")
                } else {
                    format!("{h:>w$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(self.out, "{}", header.trim_end())?;

        let rule = widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(self.out, "{rule}")?;

        for row in &table.rows {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| self.paint(&pad(cell, w), cell.style.ansi()))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(self.out, "{}", line.trim_end())?;
        }

        if table.rows.is_empty() {
            writeln!(self.out, "(no rows)")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
