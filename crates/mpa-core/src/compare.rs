use serde::Serialize;

use crate::error::MarketError;
use crate::market::{MarketRecord, RecordSet};

/// Distance between two distinct markets, with both records for display.
#[derive(Debug, Clone, Serialize)]
pub struct PairComparison {
    pub distance_miles: f64,
    pub record_a: MarketRecord,
    pub record_b: MarketRecord,
}

impl PairComparison {
    /// Arithmetic midpoint `(latitude, longitude)` of the two markets, used
    /// to centre a view that shows both.
    #[must_use]
    pub fn midpoint(&self) -> (f64, f64) {
        (
            (self.record_a.latitude + self.record_b.latitude) / 2.0,
            (self.record_a.longitude + self.record_b.longitude) / 2.0,
        )
    }
}

/// Compare two markets by name.
///
/// # Errors
///
/// Returns [`MarketError::SameMarket`] when both names refer to the same
/// market, or [`MarketError::MarketNotFound`] when either is unknown.
pub fn compare(set: &RecordSet, name_a: &str, name_b: &str) -> Result<PairComparison, MarketError> {
    let (name_a, name_b) = (name_a.trim(), name_b.trim());
    if name_a == name_b {
        return Err(MarketError::SameMarket(name_a.to_string()));
    }

    let record_a = set.find_by_name(name_a)?;
    let record_b = set.find_by_name(name_b)?;

    Ok(PairComparison {
        distance_miles: record_a.distance_miles_to(record_b),
        record_a: record_a.clone(),
        record_b: record_b.clone(),
    })
}
