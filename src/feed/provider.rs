use anyhow::Result;

use crate::market::Fixture;

/// Trait that every fixture feed must implement.
pub trait FixtureSource: Send + Sync {
    /// Return one snapshot of all currently quoted fixtures.
    fn fetch_fixtures(&self) -> Result<Vec<Fixture>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
