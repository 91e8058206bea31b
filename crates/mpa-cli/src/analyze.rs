//! Read-only market views: directory, nearest markets, pair comparison and
//! overview. Each handler loads the table fresh so it reflects the latest
//! saved staffing.

use mpa_core::{AppConfig, MarketRecord, MarketStore};

/// Pick the ranking size: the operator's request or the configured default,
/// bounded by the configured maximum.
pub(crate) fn resolve_top_n(
    requested: Option<usize>,
    config: &AppConfig,
) -> anyhow::Result<usize> {
    let top = requested.unwrap_or(config.default_top_n);
    if top == 0 || top > config.max_top_n {
        anyhow::bail!(
            "number of markets to show must be between 1 and {}, got {top}",
            config.max_top_n
        );
    }
    Ok(top)
}

/// Format a mileage for display, e.g. `"12.35 mi"`.
pub(crate) fn fmt_miles(miles: f64) -> String {
    format!("{miles:.2} mi")
}

/// Print every market with its staffing tier. File order is the default
/// since it is the order `mpa bulk` assigns counts in; `sorted` lists
/// alphabetically instead.
///
/// # Errors
///
/// Returns an error if the market table cannot be loaded.
pub(crate) fn run_markets(store: &MarketStore, sorted: bool) -> anyhow::Result<()> {
    let set = store.load()?;
    if set.is_empty() {
        println!("no markets found in {}", store.source().path().display());
        return Ok(());
    }

    let records: Vec<&MarketRecord> = if sorted {
        set.sorted_names()
            .into_iter()
            .map(|name| set.find_by_name(name))
            .collect::<Result<_, _>>()?
    } else {
        println!("Markets in file order; `mpa bulk` takes one count per market in this order.");
        set.iter().collect()
    };

    println!("{:<28}{:>6}  {:<10}MANAGER", "MARKET", "MRS", "TIER");
    for record in records {
        println!(
            "{:<28}{:>6}  {:<10}{}",
            record.name,
            record.active_staff_count,
            record.tier(),
            record.manager
        );
    }
    Ok(())
}

/// Print the `top` markets closest to `market`.
///
/// # Errors
///
/// Returns an error if the table cannot be loaded or the market is unknown.
pub(crate) fn run_nearest(store: &MarketStore, market: &str, top: usize) -> anyhow::Result<()> {
    let set = store.load()?;
    let ranking = mpa_core::rank_by_proximity(&set, market, top)?;

    println!(
        "Top {top} closest markets to {} ({:.6}, {:.6}):",
        ranking.origin.name, ranking.origin.latitude, ranking.origin.longitude
    );
    if ranking.results.is_empty() {
        println!("no other markets to compare against");
        return Ok(());
    }

    println!(
        "{:<6}{:<28}{:>12}{:>6}  {:<10}MANAGER",
        "RANK", "MARKET", "DISTANCE", "MRS", "TIER"
    );
    for (rank, result) in ranking.results.iter().enumerate() {
        println!(
            "{:<6}{:<28}{:>12}{:>6}  {:<10}{}",
            rank + 1,
            result.market.name,
            fmt_miles(result.distance_miles),
            result.market.active_staff_count,
            result.market.tier(),
            result.market.manager
        );
    }
    Ok(())
}

/// Print the distance between two markets and each one's staffing.
///
/// # Errors
///
/// Returns an error if the table cannot be loaded, either market is
/// unknown, or both names are the same market.
pub(crate) fn run_compare(store: &MarketStore, first: &str, second: &str) -> anyhow::Result<()> {
    let set = store.load()?;
    let cmp = mpa_core::compare(&set, first, second)?;

    println!("Distance: {:.2} miles", cmp.distance_miles);
    for record in [&cmp.record_a, &cmp.record_b] {
        println!(
            "{}: {} MR(s), {} [{}]",
            record.name,
            record.active_staff_count,
            if record.manager.is_empty() {
                "\u{2014}"
            } else {
                record.manager.as_str()
            },
            record.tier()
        );
    }
    let (lat, lon) = cmp.midpoint();
    println!("Midpoint: {lat:.6}, {lon:.6}");
    Ok(())
}

/// Print every market in file order with tier, marker colour and
/// coordinates, followed by the centroid.
///
/// # Errors
///
/// Returns an error if the market table cannot be loaded.
pub(crate) fn run_overview(store: &MarketStore) -> anyhow::Result<()> {
    let set = store.load()?;
    let overview = mpa_core::overview(&set);

    let Some((center_lat, center_lon)) = overview.centroid else {
        println!("no market data available");
        return Ok(());
    };

    println!(
        "{:<28}{:>12}{:>13}{:>6}  {:<10}{:<10}MANAGER",
        "MARKET", "LATITUDE", "LONGITUDE", "MRS", "TIER", "MARKER"
    );
    for entry in &overview.entries {
        println!(
            "{:<28}{:>12.6}{:>13.6}{:>6}  {:<10}{:<10}{}",
            entry.market.name,
            entry.market.latitude,
            entry.market.longitude,
            entry.market.active_staff_count,
            entry.tier,
            entry.tier.marker_color(),
            entry.market.manager
        );
    }
    println!();
    println!(
        "{} markets, centred on {center_lat:.6}, {center_lon:.6}",
        overview.entries.len()
    );
    Ok(())
}
