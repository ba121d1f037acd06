//! Remote dataset access port trait.

use crate::domain::error::CotError;
use crate::domain::soql::SoqlQuery;

/// One result row, keyed by field name.
pub type Record = serde_json::Map<String, serde_json::Value>;

pub trait DatasetPort {
    /// Run `query` against `dataset` and return the rows in the order received.
    fn query(&self, dataset: &str, query: &SoqlQuery) -> Result<Vec<Record>, CotError>;
}
