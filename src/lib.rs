pub mod arb;
pub mod config;
pub mod error;
pub mod feed;
pub mod market;
pub mod report;

pub use arb::{compute_arbitrage, optimize_stakes, scan, PricedEvent, Scan, ScanConfig};
pub use error::ArbError;
pub use market::{partition_and_cluster, Event, Fixture, MatchConfig};
