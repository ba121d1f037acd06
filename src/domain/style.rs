//! Conditional styling of the net-change column.

/// Host-independent style tag for a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellStyle {
    Positive,
    Negative,
    Neutral,
}

/// Positive above zero, negative below, neutral for zero or null.
pub fn style(value: Option<i64>) -> CellStyle {
    match value {
        Some(v) if v > 0 => CellStyle::Positive,
        Some(v) if v < 0 => CellStyle::Negative,
        _ => CellStyle::Neutral,
    }
}

impl CellStyle {
    /// Inline CSS declaration for HTML hosts.
    pub fn css(self) -> &'static str {
        match self {
            CellStyle::Positive => "color: blue; font-weight: bold",
            CellStyle::Negative => "color: red; font-weight: bold",
            CellStyle::Neutral => "",
        }
    }

    /// SGR escape sequence for terminals; empty when neutral.
    pub fn ansi(self) -> &'static str {
        match self {
            CellStyle::Positive => "\x1b[1;34m",
            CellStyle::Negative => "\x1b[1;31m",
            CellStyle::Neutral => "",
        }
    }

    pub fn is_neutral(self) -> bool {
        self == CellStyle::Neutral
    }
}
