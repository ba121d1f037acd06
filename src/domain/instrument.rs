//! Instrument filter: the fixed set of commodity names a report is restricted to.

use std::collections::HashSet;

/// Default instruments tracked by the dashboard.
pub const DEFAULT_INSTRUMENTS: [&str; 14] = [
    "EURO FX",
    "BRITISH POUND",
    "JAPANESE YEN",
    "CANADIAN DOLLAR",
    "SWISS FRANC",
    "AUSTRALIAN DOLLAR",
    "NEW ZEALAND DOLLAR",
    "US DOLLAR INDEX",
    "S&P 500",
    "NASDAQ-100",
    "DOW JONES INDUSTRIAL AVERAGE",
    "GOLD",
    "SILVER",
    "CRUDE OIL WTI",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstrumentError {
    #[error("empty token in instrument list")]
    EmptyToken,

    #[error("duplicate instrument: {0}")]
    DuplicateInstrument(String),

    #[error("instrument list is empty")]
    Empty,
}

/// Ordered, duplicate-free, non-empty list of instrument names.
///
/// Names are matched exactly against the remote dataset, so no case folding
/// is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentFilter {
    names: Vec<String>,
}

impl InstrumentFilter {
    pub fn new<I, S>(names: I) -> Result<Self, InstrumentError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for name in names {
            let name: String = name.into();
            if name.trim().is_empty() {
                return Err(InstrumentError::EmptyToken);
            }
            if !seen.insert(name.clone()) {
                return Err(InstrumentError::DuplicateInstrument(name));
            }
            out.push(name);
        }
        if out.is_empty() {
            return Err(InstrumentError::Empty);
        }
        Ok(Self { names: out })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl Default for InstrumentFilter {
    fn default() -> Self {
        Self {
            names: DEFAULT_INSTRUMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Parse a comma-separated instrument list, e.g. `"GOLD, SILVER"`.
pub fn parse_instruments(input: &str) -> Result<InstrumentFilter, InstrumentError> {
    let mut names = Vec::new();
    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(InstrumentError::EmptyToken);
        }
        names.push(trimmed.to_string());
    }
    InstrumentFilter::new(names)
}
