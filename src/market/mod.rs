pub mod assignment;
pub mod cluster;
pub mod models;
pub mod partition;
pub mod similarity;

pub use cluster::{partition_and_cluster, refine};
pub use models::{Event, Fixture, Outcome, RawFixture};
pub use partition::{partition, MarketKey};
pub use similarity::{align, edit_distance, Alignment, MatchConfig, DEFAULT_SIMILARITY_THRESHOLD};
