use serde::Serialize;
use tracing::{debug, warn};

use super::engine::{compute_arbitrage, Arbitrage};
use super::stakes::{optimize_stakes, StakePlan};
use crate::error::ArbError;
use crate::market::{partition_and_cluster, Event, Fixture, MatchConfig};

/// Ordering of the final opportunity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
pub enum RankBy {
    /// Highest ROI first
    #[default]
    Roi,
    /// Lowest arbitrage figure first
    Arbitrage,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanConfig {
    pub matching: MatchConfig,
    pub rank_by: RankBy,
}

/// An event together with its arbitrage figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedEvent {
    pub event: Event,
    pub arbitrage: Arbitrage,
}

impl PricedEvent {
    pub fn price(event: Event) -> Result<Self, ArbError> {
        let arbitrage = compute_arbitrage(&event)?;
        Ok(PricedEvent { event, arbitrage })
    }

    pub fn stake_plan(&self) -> StakePlan {
        optimize_stakes(self)
    }
}

/// An event that could not be priced, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub event: Event,
    pub error: ArbError,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scan {
    pub ranked: Vec<PricedEvent>,
    pub rejected: Vec<Rejected>,
}

impl Scan {
    /// Ranked events with a strictly positive ROI.
    pub fn profitable(&self) -> impl Iterator<Item = &PricedEvent> {
        self.ranked.iter().filter(|p| p.arbitrage.is_profitable())
    }

    pub fn fixture_count(&self) -> usize {
        self.ranked
            .iter()
            .map(|p| &p.event)
            .chain(self.rejected.iter().map(|r| &r.event))
            .map(|e| e.fixtures.len())
            .sum()
    }
}

/// Order events in place. Stable, so equal keys keep clustering order.
pub fn rank(events: &mut [PricedEvent], by: RankBy) {
    match by {
        RankBy::Roi => events.sort_by(|a, b| b.arbitrage.roi.total_cmp(&a.arbitrage.roi)),
        RankBy::Arbitrage => events.sort_by(|a, b| {
            a.arbitrage
                .figure()
                .total_cmp(&b.arbitrage.figure())
        }),
    }
}

/// Run the whole pipeline over one snapshot: cluster, price, rank.
///
/// Events that cannot be priced are returned in `Scan::rejected` rather than
/// failing the scan.
pub fn scan(fixtures: Vec<Fixture>, config: &ScanConfig) -> Scan {
    let events = partition_and_cluster(fixtures, &config.matching);

    let mut result = Scan::default();
    for event in events {
        match compute_arbitrage(&event) {
            Ok(arbitrage) => result.ranked.push(PricedEvent { event, arbitrage }),
            Err(error) => {
                warn!("Skipping event '{}': {}", event.title(), error);
                result.rejected.push(Rejected { event, error });
            }
        }
    }

    rank(&mut result.ranked, config.rank_by);
    debug!(
        "Scan ranked {} event(s) by {:?}, rejected {}",
        result.ranked.len(),
        config.rank_by,
        result.rejected.len()
    );
    result
}
