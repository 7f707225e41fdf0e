pub mod demo;
pub mod filter;
pub mod provider;
pub mod snapshot;

pub use demo::DemoFeed;
pub use filter::{SnapshotFilter, DEFAULT_MAX_OUTCOMES};
pub use provider::FixtureSource;
pub use snapshot::{parse_snapshot, JsonSnapshot};
