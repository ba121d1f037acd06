//! Display surface port trait.

use crate::domain::error::CotError;
use crate::domain::presenter::{PageMeta, StyledTable};

/// A host that can show a captioned, per-cell styled table.
pub trait DisplayPort {
    fn set_page(&mut self, meta: &PageMeta) -> Result<(), CotError>;

    fn caption(&mut self, text: &str) -> Result<(), CotError>;

    fn render_table(&mut self, table: &StyledTable) -> Result<(), CotError>;
}
