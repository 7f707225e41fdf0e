pub mod engine;
pub mod scan;
pub mod stakes;

pub use engine::{compute_arbitrage, Arbitrage, BestQuote, Side};
pub use scan::{rank, scan, PricedEvent, RankBy, Rejected, Scan, ScanConfig};
pub use stakes::{optimize_stakes, StakeLeg, StakePlan};
