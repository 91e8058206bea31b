//! Market proximity analysis: great-circle ranking, staffing tiers and
//! staffing updates over a tabular market store.

pub mod app_config;
pub mod bulk;
pub mod classify;
pub mod compare;
pub mod config;
pub mod error;
pub mod geo;
pub mod market;
pub mod overview;
pub mod ranking;
pub mod store;

pub use app_config::{AppConfig, Environment};
pub use bulk::{apply_bulk, parse_count_tokens};
pub use classify::{classify, Tier};
pub use compare::{compare, PairComparison};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ErrorKind, MarketError};
pub use market::{MarketRecord, RecordSet};
pub use overview::{overview, Overview, OverviewEntry};
pub use ranking::{rank_by_proximity, DistanceResult, Ranking};
pub use store::{parse_staff_count, CsvFileSource, MarketStore, RecordSource, Table};
