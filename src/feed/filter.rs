use chrono::{DateTime, Utc};
use tracing::debug;

use crate::market::Fixture;

pub const DEFAULT_MAX_OUTCOMES: usize = 3;

/// Pre-scan filter over a snapshot.
///
/// Expired quotes can no longer be bet on, and markets with many outcomes
/// make the assignment step needlessly expensive.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotFilter {
    pub now: DateTime<Utc>,
    pub max_outcomes: usize,
    /// Drop fixtures whose event has already started
    pub prematch_only: bool,
}

impl SnapshotFilter {
    pub fn new(now: DateTime<Utc>) -> Self {
        SnapshotFilter {
            now,
            max_outcomes: DEFAULT_MAX_OUTCOMES,
            prematch_only: false,
        }
    }

    pub fn keeps(&self, fixture: &Fixture) -> bool {
        fixture.expires_at > self.now
            && fixture.outcome_count() <= self.max_outcomes
            && !(self.prematch_only && fixture.start_time <= self.now)
    }

    pub fn apply(&self, fixtures: Vec<Fixture>) -> Vec<Fixture> {
        let total = fixtures.len();
        let kept: Vec<Fixture> = fixtures.into_iter().filter(|f| self.keeps(f)).collect();
        if kept.len() < total {
            debug!(
                "Filtered out {} of {} fixtures (max_outcomes={}, prematch_only={})",
                total - kept.len(),
                total,
                self.max_outcomes,
                self.prematch_only
            );
        }
        kept
    }
}
