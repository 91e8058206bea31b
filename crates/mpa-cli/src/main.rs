mod analyze;
mod staffing;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mpa")]
#[command(about = "Market proximity analyzer")]
struct Cli {
    /// Market table to read and update (overrides `MPA_MARKETS_PATH`)
    #[arg(long, global = true)]
    markets: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List markets in file order (the order `bulk` expects) with staffing tier
    Markets {
        /// List alphabetically instead
        #[arg(long)]
        sorted: bool,
    },
    /// Show the markets closest to a given market
    Nearest {
        /// Origin market name
        market: String,
        /// Number of markets to show (defaults to `MPA_DEFAULT_TOP_N`)
        #[arg(long, short = 'n')]
        top: Option<usize>,
    },
    /// Distance and staffing for two markets
    Compare {
        first: String,
        second: String,
    },
    /// Every market with tier and coordinates, plus the overall centre
    Overview,
    /// Set the active MR count for one market
    Update {
        market: String,
        #[arg(allow_hyphen_values = true)]
        count: String,
    },
    /// Set active MR counts for all markets at once
    Bulk {
        /// Counts, one per market, in file order (as listed by `markets`)
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        counts: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let config = mpa_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let markets_path = cli.markets.unwrap_or_else(|| config.markets_path.clone());
    tracing::debug!(env = %config.env, path = %markets_path.display(), "starting");
    let store = mpa_core::MarketStore::open_csv(markets_path);

    match cli.command {
        Commands::Markets { sorted } => analyze::run_markets(&store, sorted),
        Commands::Nearest { market, top } => {
            let top = analyze::resolve_top_n(top, &config)?;
            analyze::run_nearest(&store, &market, top)
        }
        Commands::Compare { first, second } => analyze::run_compare(&store, &first, &second),
        Commands::Overview => analyze::run_overview(&store),
        Commands::Update { market, count } => staffing::run_update(&store, &market, &count),
        Commands::Bulk { counts } => staffing::run_bulk(&store, &counts),
    }
}
