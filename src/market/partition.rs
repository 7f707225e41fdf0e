//! Exact-key bucketing of fixtures.
//!
//! Fixtures can only quote the same market if they agree on kickoff, bet
//! type, sport, outcome count and handicap line. Bucketing on those keys
//! first keeps the expensive name alignment inside small groups.

use std::cmp::Ordering;

use super::models::Fixture;

/// One field two fixtures must agree on to share a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketKey {
    StartTime,
    BetType,
    Sport,
    OutcomeCount,
    Line,
}

impl MarketKey {
    /// Every key, most significant first.
    pub const DEFAULT: [MarketKey; 5] = [
        MarketKey::StartTime,
        MarketKey::BetType,
        MarketKey::Sport,
        MarketKey::OutcomeCount,
        MarketKey::Line,
    ];

    pub fn compare(&self, a: &Fixture, b: &Fixture) -> Ordering {
        match self {
            MarketKey::StartTime => a.start_time.cmp(&b.start_time),
            MarketKey::BetType => a.bet_type_id.cmp(&b.bet_type_id),
            MarketKey::Sport => a.sport_id.cmp(&b.sport_id),
            MarketKey::OutcomeCount => a.outcome_count().cmp(&b.outcome_count()),
            MarketKey::Line => a.line.cmp(&b.line),
        }
    }
}

/// Split `fixtures` into maximal groups that agree on every key.
///
/// One stable sort per key, least significant first, leaves the fixtures
/// ordered by the full composite key; a new group starts wherever two
/// neighbours differ under any key. Groups come out in key order, and
/// fixtures keep their input order within a group.
pub fn partition(mut fixtures: Vec<Fixture>, keys: &[MarketKey]) -> Vec<Vec<Fixture>> {
    if fixtures.is_empty() {
        return Vec::new();
    }

    for key in keys.iter().rev() {
        fixtures.sort_by(|a, b| key.compare(a, b));
    }

    let mut groups: Vec<Vec<Fixture>> = Vec::new();
    for fixture in fixtures {
        let same_bucket = groups
            .last()
            .and_then(|group| group.last())
            .is_some_and(|prev| {
                keys.iter()
                    .all(|key| key.compare(prev, &fixture) == Ordering::Equal)
            });
        match groups.last_mut() {
            Some(group) if same_bucket => group.push(fixture),
            _ => groups.push(vec![fixture]),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::models::tests::make_fixture;
    use chrono::Duration;

    fn ids(groups: &[Vec<Fixture>]) -> Vec<Vec<u32>> {
        groups
            .iter()
            .map(|g| g.iter().map(|f| f.fixture_id).collect())
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(partition(Vec::new(), &MarketKey::DEFAULT).is_empty());
    }

    #[test]
    fn test_identical_keys_share_bucket() {
        let fixtures = vec![
            make_fixture(1, 1, &["a", "b"], &[0.5, 0.5]),
            make_fixture(2, 2, &["b", "a"], &[0.5, 0.5]),
        ];
        let groups = partition(fixtures, &MarketKey::DEFAULT);
        assert_eq!(ids(&groups), vec![vec![1, 2]]);
    }

    #[test]
    fn test_any_differing_key_splits() {
        let base = || make_fixture(1, 0, &["a", "b"], &[0.5, 0.5]);
        let variants: Vec<Box<dyn Fn(&mut Fixture)>> = vec![
            Box::new(|f: &mut Fixture| f.start_time += Duration::minutes(15)),
            Box::new(|f: &mut Fixture| f.bet_type_id = 2),
            Box::new(|f: &mut Fixture| f.sport_id = 3),
            Box::new(|f: &mut Fixture| f.outcomes.truncate(1)),
            Box::new(|f: &mut Fixture| f.line = -1),
        ];
        for change in variants {
            let mut other = base();
            other.fixture_id = 1;
            change(&mut other);
            let groups = partition(vec![base(), other], &MarketKey::DEFAULT);
            assert_eq!(groups.len(), 2);
        }
    }

    #[test]
    fn test_non_adjacent_duplicates_are_merged() {
        let mut later = make_fixture(1, 2, &["x", "y"], &[0.5, 0.5]);
        later.start_time += Duration::hours(1);
        let fixtures = vec![
            make_fixture(1, 1, &["a", "b"], &[0.5, 0.5]),
            later,
            make_fixture(2, 3, &["a", "b"], &[0.5, 0.5]),
        ];
        let groups = partition(fixtures, &MarketKey::DEFAULT);
        assert_eq!(ids(&groups), vec![vec![1, 3], vec![2]]);
    }

    #[test]
    fn test_groups_ordered_by_most_significant_key() {
        let mut early_sport_9 = make_fixture(1, 1, &["a", "b"], &[0.5, 0.5]);
        early_sport_9.sport_id = 9;
        let mut late_sport_1 = make_fixture(1, 2, &["a", "b"], &[0.5, 0.5]);
        late_sport_1.start_time += Duration::hours(2);
        let early_sport_1 = make_fixture(1, 3, &["a", "b"], &[0.5, 0.5]);

        let groups = partition(
            vec![late_sport_1, early_sport_9, early_sport_1],
            &MarketKey::DEFAULT,
        );
        assert_eq!(ids(&groups), vec![vec![3], vec![1], vec![2]]);
    }

    #[test]
    fn test_fewer_keys_give_coarser_buckets() {
        let mut other_line = make_fixture(1, 2, &["a", "b"], &[0.5, 0.5]);
        other_line.line = 2;
        let fixtures = vec![make_fixture(1, 1, &["a", "b"], &[0.5, 0.5]), other_line];
        let groups = partition(fixtures, &[MarketKey::StartTime, MarketKey::Sport]);
        assert_eq!(groups.len(), 1);
    }
}
