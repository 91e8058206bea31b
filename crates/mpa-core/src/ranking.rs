//! Nearest-market ranking.

use serde::Serialize;

use crate::error::MarketError;
use crate::market::{MarketRecord, RecordSet};

/// One ranked neighbour of the origin market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceResult {
    pub market: MarketRecord,
    /// Great-circle miles from the origin; never negative.
    pub distance_miles: f64,
}

impl DistanceResult {
    /// `(name, miles, latitude, longitude, active staff, manager)`.
    #[must_use]
    pub fn as_tuple(&self) -> (&str, f64, f64, f64, u32, &str) {
        (
            &self.market.name,
            self.distance_miles,
            self.market.latitude,
            self.market.longitude,
            self.market.active_staff_count,
            &self.market.manager,
        )
    }
}

/// The origin market plus its nearest neighbours, closest first.
#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    pub origin: MarketRecord,
    pub results: Vec<DistanceResult>,
}

/// Rank every other market by distance from `origin_name` and keep the
/// closest `limit`.
///
/// Equal distances keep record-set order. Fewer than `limit` neighbours is
/// not an error; all of them are returned.
///
/// # Errors
///
/// Returns [`MarketError::Validation`] if `limit` is zero, or
/// [`MarketError::MarketNotFound`] if the origin is unknown.
pub fn rank_by_proximity(
    set: &RecordSet,
    origin_name: &str,
    limit: usize,
) -> Result<Ranking, MarketError> {
    if limit == 0 {
        return Err(MarketError::Validation(
            "ranking limit must be at least 1".to_string(),
        ));
    }

    let origin = set.find_by_name(origin_name)?;

    let mut results: Vec<DistanceResult> = set
        .iter()
        .filter(|r| r.name != origin.name)
        .map(|r| DistanceResult {
            distance_miles: origin.distance_miles_to(r),
            market: r.clone(),
        })
        .collect();

    // `sort_by` is stable, which is what keeps ties in record order.
    results.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    results.truncate(limit);

    tracing::debug!(
        origin = %origin.name,
        limit,
        returned = results.len(),
        "ranked markets by proximity"
    );

    Ok(Ranking {
        origin: origin.clone(),
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo;

    fn market(name: &str, lat: f64, lon: f64, staff: u32) -> MarketRecord {
        MarketRecord {
            name: name.to_string(),
            latitude: lat,
            longitude: lon,
            active_staff_count: staff,
            manager: format!("{name} Manager"),
        }
    }

    fn abc() -> RecordSet {
        RecordSet::from_records(vec![
            market("A", 0.0, 0.0, 3),
            market("B", 0.0, 1.0, 0),
            market("C", 1.0, 0.0, 1),
        ])
        .unwrap()
    }

    #[test]
    fn equator_scenario_ranks_by_computed_distance() {
        let set = abc();
        let ranking = rank_by_proximity(&set, "A", 2).unwrap();
        assert_eq!(ranking.origin.name, "A");
        assert_eq!(ranking.results.len(), 2);

        let ab = geo::distance_miles(0.0, 0.0, 0.0, 1.0);
        let ac = geo::distance_miles(0.0, 0.0, 1.0, 0.0);
        // On a sphere one degree of latitude and one of longitude at the
        // equator are the same arc, so B and C tie and keep record order.
        assert!((ab - ac).abs() < 1e-9);
        assert_eq!(ranking.results[0].market.name, "B");
        assert_eq!(ranking.results[1].market.name, "C");
        assert!((ranking.results[0].distance_miles - ab).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_record_order_when_reversed() {
        let set = RecordSet::from_records(vec![
            market("A", 0.0, 0.0, 3),
            market("C", 1.0, 0.0, 1),
            market("B", 0.0, 1.0, 0),
        ])
        .unwrap();
        let ranking = rank_by_proximity(&set, "A", 5).unwrap();
        let names: Vec<&str> = ranking.results.iter().map(|r| r.market.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B"]);
    }

    #[test]
    fn results_are_non_decreasing_and_exclude_origin() {
        let set = RecordSet::from_records(vec![
            market("Columbia", 34.000_71, -81.034_814, 3),
            market("Charleston", 32.776_475, -79.931_051, 0),
            market("Greenville", 34.852_618, -82.394_01, 1),
            market("Sumter", 33.920_435, -80.341_47, 2),
            market("Florence", 34.195_433, -79.762_563, 4),
            market("Aiken", 33.560_416, -81.719_551, 1),
        ])
        .unwrap();

        let ranking = rank_by_proximity(&set, "Columbia", 10).unwrap();
        assert_eq!(ranking.results.len(), 5);
        assert!(ranking.results.iter().all(|r| r.market.name != "Columbia"));
        assert!(ranking
            .results
            .windows(2)
            .all(|w| w[0].distance_miles <= w[1].distance_miles));
        assert_eq!(ranking.results[0].market.name, "Sumter");
    }

    #[test]
    fn limit_truncates() {
        let ranking = rank_by_proximity(&abc(), "C", 1).unwrap();
        assert_eq!(ranking.results.len(), 1);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = rank_by_proximity(&abc(), "A", 0).unwrap_err();
        assert!(matches!(err, MarketError::Validation(_)));
    }

    #[test]
    fn unknown_origin_is_not_found() {
        let err = rank_by_proximity(&abc(), "Z", 3).unwrap_err();
        assert!(matches!(err, MarketError::MarketNotFound(ref n) if n == "Z"));
    }

    #[test]
    fn single_market_ranks_nothing() {
        let set = RecordSet::from_records(vec![market("Solo", 10.0, 10.0, 1)]).unwrap();
        let ranking = rank_by_proximity(&set, "Solo", 3).unwrap();
        assert!(ranking.results.is_empty());
    }

    #[test]
    fn tuple_view_matches_record() {
        let ranking = rank_by_proximity(&abc(), "A", 1).unwrap();
        let (name, miles, lat, lon, staff, manager) = ranking.results[0].as_tuple();
        assert_eq!(name, "B");
        assert!(miles > 0.0);
        assert!(lat.abs() < 1e-12);
        assert!((lon - 1.0).abs() < 1e-12);
        assert_eq!(staff, 0);
        assert_eq!(manager, "B Manager");
    }
}
