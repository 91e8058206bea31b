//! Staffing update commands. Both write the market table back to disk
//! before reporting success.

use mpa_core::MarketStore;

/// Set the active MR count for a single market.
///
/// # Errors
///
/// Returns an error if `count` is not a non-negative integer, the market is
/// unknown, or the table cannot be loaded or saved.
pub(crate) fn run_update(store: &MarketStore, market: &str, count: &str) -> anyhow::Result<()> {
    let count = mpa_core::parse_staff_count(count)?;
    let set = store.load()?;
    let updated = store.update_staff_count(&set, market, i64::from(count))?;
    let record = updated.find_by_name(market)?;

    println!(
        "Active MRs for '{}' updated to {} ({}) and saved",
        record.name,
        record.active_staff_count,
        record.tier()
    );
    Ok(())
}

/// Set the active MR count for every market, one count per market in file
/// order. Each argument may itself hold several whitespace-separated counts.
///
/// # Errors
///
/// Returns an error if the input is empty, the number of counts does not
/// match the number of markets, any count is invalid, or the table cannot be
/// loaded or saved. Nothing is written unless every count is accepted.
pub(crate) fn run_bulk(store: &MarketStore, counts: &[String]) -> anyhow::Result<()> {
    let tokens: Vec<&str> = counts
        .iter()
        .flat_map(|arg| mpa_core::parse_count_tokens(arg))
        .collect();
    if tokens.is_empty() {
        anyhow::bail!("enter one active MR count per market, separated by spaces");
    }

    let set = store.load()?;
    let updated = store.apply_bulk(&set, tokens.as_slice())?;

    println!(
        "Active MRs for all {} markets updated and saved to '{}'",
        updated.len(),
        store.source().path().display()
    );
    Ok(())
}
