//! End-to-end tests against a CSV market file on disk.

use mpa_core::{
    apply_bulk, classify, compare, parse_count_tokens, rank_by_proximity, ErrorKind, MarketError,
    MarketStore, Tier,
};
use tempfile::TempDir;

const MARKETS_CSV: &str = "\
Market,Latitude,Longitude,Active MRs,Manager,Region
A,0,0,3,Ana,Equator
B,0,1,0,Ben,Equator
C,1,0,1,Cal,Equator
";

fn seeded_store() -> (TempDir, std::path::PathBuf, MarketStore) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("markets.csv");
    std::fs::write(&path, MARKETS_CSV).unwrap();
    let store = MarketStore::open_csv(&path);
    (dir, path, store)
}

#[test]
fn three_market_scenario() {
    let (_dir, _path, store) = seeded_store();
    let set = store.load().unwrap();

    let ranking = rank_by_proximity(&set, "A", 2).unwrap();
    let names: Vec<&str> = ranking.results.iter().map(|r| r.market.name.as_str()).collect();
    assert_eq!(names, vec!["B", "C"]);
    assert!(ranking.results[0].distance_miles <= ranking.results[1].distance_miles);
    // 1 degree of arc is about 69.1 miles.
    assert!((ranking.results[0].distance_miles - 69.09).abs() < 0.05);

    assert_eq!(classify(3), Tier::Healthy);
    assert_eq!(classify(0), Tier::Empty);
    assert_eq!(classify(1), Tier::Low);
    assert_eq!(set.find_by_name("A").unwrap().tier(), Tier::Healthy);
}

#[test]
fn single_update_survives_reload() {
    let (_dir, _path, store) = seeded_store();
    let set = store.load().unwrap();

    store.update_staff_count(&set, "B", 2).unwrap();

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.find_by_name("B").unwrap().active_staff_count, 2);
    assert_eq!(reloaded.find_by_name("B").unwrap().tier(), Tier::Adequate);
}

#[test]
fn bulk_update_survives_reload_without_schema_drift() {
    let (_dir, path, store) = seeded_store();
    let set = store.load().unwrap();

    let tokens = parse_count_tokens("5 4 0");
    store.apply_bulk(&set, tokens.as_slice()).unwrap();

    let reloaded = store.load().unwrap();
    let counts: Vec<u32> = reloaded.iter().map(|r| r.active_staff_count).collect();
    assert_eq!(counts, vec![5, 4, 0]);

    let written = std::fs::read_to_string(&path).unwrap();
    let first_line = written.lines().next().unwrap();
    assert_eq!(first_line, "Market,Latitude,Longitude,Active MRs,Manager,Region");
    assert!(written.contains("B,0,1,4,Ben,Equator"));
}

#[test]
fn bulk_length_mismatch_leaves_file_unchanged() {
    let (_dir, path, store) = seeded_store();
    let set = store.load().unwrap();

    let err = store.apply_bulk(&set, &["1", "2"]).unwrap_err();
    assert!(matches!(err, MarketError::CountMismatch { expected: 3, actual: 2 }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), MARKETS_CSV);
}

#[test]
fn bulk_bad_token_leaves_file_unchanged() {
    let (_dir, path, store) = seeded_store();
    let set = store.load().unwrap();

    let err = store.apply_bulk(&set, &["1", "two", "3"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), MARKETS_CSV);
}

#[test]
fn pure_bulk_does_not_touch_disk() {
    let (_dir, path, store) = seeded_store();
    let set = store.load().unwrap();

    let updated = apply_bulk(&set, &["9", "9", "9"]).unwrap();
    assert!(updated.iter().all(|r| r.active_staff_count == 9));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), MARKETS_CSV);
}

#[test]
fn compare_same_market_fails() {
    let (_dir, _path, store) = seeded_store();
    let set = store.load().unwrap();

    let err = compare(&set, "A", "A").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SameMarket);
}
