use rayon::prelude::*;
use tracing::debug;

use super::models::{Event, Fixture};
use super::partition::{partition, MarketKey};
use super::similarity::{similar_permutation, MatchConfig};

/// Split one exact-key bucket into events.
///
/// The first pending fixture anchors a new event; every other pending fixture
/// whose names align with it is reordered to match and joins, the rest wait
/// for the next anchor. Each round claims at least the anchor, so the loop
/// ends with every fixture in exactly one event.
pub fn refine(group: Vec<Fixture>, config: &MatchConfig) -> Vec<Event> {
    let mut events = Vec::new();
    let mut pending = group;

    while !pending.is_empty() {
        let mut rest = pending.into_iter();
        let Some(representative) = rest.next() else {
            break;
        };

        let mut matched = Vec::new();
        let mut carry = Vec::new();
        {
            let reference: Vec<&str> = representative.participants().collect();
            for mut candidate in rest {
                let order = {
                    let names: Vec<&str> = candidate.participants().collect();
                    similar_permutation(&reference, &names, config)
                };
                match order.map(|order| candidate.permute(&order)) {
                    Some(Ok(())) => matched.push(candidate),
                    _ => carry.push(candidate),
                }
            }
        }

        if !carry.is_empty() {
            debug!(
                "Bucket split: {} fixture(s) matched {:?}, {} carried over",
                matched.len() + 1,
                representative.participants().collect::<Vec<_>>(),
                carry.len()
            );
        }

        events.push(Event::from_cluster(representative, matched));
        pending = carry;
    }

    events
}

/// Group raw fixtures into events: exact-key buckets first, then fuzzy
/// name matching inside each bucket.
///
/// Buckets are refined in parallel; events come back in bucket order, so the
/// result does not depend on scheduling.
pub fn partition_and_cluster(fixtures: Vec<Fixture>, config: &MatchConfig) -> Vec<Event> {
    let fixture_count = fixtures.len();
    let groups = partition(fixtures, &MarketKey::DEFAULT);
    let bucket_count = groups.len();

    let per_group: Vec<Vec<Event>> = groups
        .into_par_iter()
        .map(|group| refine(group, config))
        .collect();
    let events: Vec<Event> = per_group.into_iter().flatten().collect();

    debug!(
        "Clustered {} fixture(s) into {} bucket(s), {} event(s)",
        fixture_count,
        bucket_count,
        events.len()
    );
    events
}
