use serde::Serialize;

use crate::classify::Tier;
use crate::market::{MarketRecord, RecordSet};

#[derive(Debug, Clone, Serialize)]
pub struct OverviewEntry {
    pub market: MarketRecord,
    pub tier: Tier,
}

/// Every market with its tier, plus the centroid of all markets.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub entries: Vec<OverviewEntry>,
    /// Mean `(latitude, longitude)`; `None` for an empty set.
    pub centroid: Option<(f64, f64)>,
}

#[must_use]
pub fn overview(set: &RecordSet) -> Overview {
    let entries = set
        .iter()
        .map(|r| OverviewEntry {
            tier: r.tier(),
            market: r.clone(),
        })
        .collect();

    let centroid = if set.is_empty() {
        None
    } else {
        // Market counts are far below f64's exact-integer range.
        #[allow(clippy::cast_precision_loss)]
        let n = set.len() as f64;
        let (lat_sum, lon_sum) = set
            .iter()
            .fold((0.0, 0.0), |(lat, lon), r| (lat + r.latitude, lon + r.longitude));
        Some((lat_sum / n, lon_sum / n))
    };

    Overview { entries, centroid }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_and_tiers() {
        let set = RecordSet::from_records(vec![
            MarketRecord {
                name: "North".to_string(),
                latitude: 10.0,
                longitude: 20.0,
                active_staff_count: 5,
                manager: String::new(),
            },
            MarketRecord {
                name: "South".to_string(),
                latitude: -10.0,
                longitude: 40.0,
                active_staff_count: 1,
                manager: String::new(),
            },
        ])
        .unwrap();

        let ov = overview(&set);
        let (lat, lon) = ov.centroid.unwrap();
        assert!(lat.abs() < 1e-12);
        assert!((lon - 30.0).abs() < 1e-12);
        assert_eq!(ov.entries[0].tier, Tier::Healthy);
        assert_eq!(ov.entries[1].tier, Tier::Low);
    }

    #[test]
    fn empty_set_has_no_centroid() {
        let set = RecordSet::from_records(Vec::new()).unwrap();
        let ov = overview(&set);
        assert!(ov.entries.is_empty());
        assert!(ov.centroid.is_none());
    }
}
