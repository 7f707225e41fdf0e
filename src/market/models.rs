use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ArbError;

/// One outcome of a provider quote: who it is about and what it costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Participant name exactly as the provider spells it
    pub participant: String,
    /// Stake needed to win one unit if this outcome happens (lower is better)
    pub price: f64,
    /// Stake needed to win one unit if this outcome does NOT happen
    pub not_price: f64,
}

/// A single provider's quote for one market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fixture {
    pub provider_id: u32,
    pub fixture_id: u32,
    pub sport_id: u32,
    pub bet_type_id: u32,
    /// Handicap line, 0 when the market has none
    pub line: i32,
    pub start_time: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// ISO currency code the bet limit is expressed in
    pub currency: String,
    /// Largest nominal stake the provider accepts on a single outcome
    pub max_bet: f64,
    pub outcomes: Vec<Outcome>,
}

impl Fixture {
    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().map(|o| o.participant.as_str())
    }

    /// Reorder outcomes so that position `i` holds what was at `order[i]`.
    ///
    /// Name, price and not-price move together, so the three can never drift
    /// out of step.
    pub fn permute(&mut self, order: &[usize]) -> Result<(), ArbError> {
        let n = self.outcomes.len();
        if order.len() != n {
            return Err(ArbError::LengthMismatch {
                left: n,
                right: order.len(),
            });
        }
        if !is_permutation(order) {
            return Err(ArbError::NotAPermutation {
                order: order.to_vec(),
            });
        }

        let mut done = vec![false; n];
        for start in 0..n {
            if done[start] {
                continue;
            }
            let mut i = start;
            loop {
                done[i] = true;
                let j = order[i];
                if j == start {
                    break;
                }
                self.outcomes.swap(i, j);
                i = j;
            }
        }
        Ok(())
    }
}

fn is_permutation(order: &[usize]) -> bool {
    let mut seen = vec![false; order.len()];
    order.iter().all(|&j| {
        j < seen.len() && !std::mem::replace(&mut seen[j], true)
    })
}

/// Fixture as delivered by ingestion: three parallel per-outcome arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFixture {
    pub provider_id: u32,
    pub fixture_id: u32,
    pub sport_id: u32,
    pub bet_type_id: u32,
    #[serde(default)]
    pub line: i32,
    pub start_time: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub currency: String,
    pub max_bet: f64,
    pub participants: Vec<String>,
    pub prices: Vec<f64>,
    pub not_prices: Vec<f64>,
}

impl TryFrom<RawFixture> for Fixture {
    type Error = ArbError;

    fn try_from(raw: RawFixture) -> Result<Self, Self::Error> {
        let n = raw.participants.len();
        for len in [raw.prices.len(), raw.not_prices.len()] {
            if len != n {
                return Err(ArbError::LengthMismatch { left: n, right: len });
            }
        }
        let outcomes = raw
            .participants
            .into_iter()
            .zip(raw.prices)
            .zip(raw.not_prices)
            .map(|((participant, price), not_price)| Outcome {
                participant,
                price,
                not_price,
            })
            .collect();
        Ok(Fixture {
            provider_id: raw.provider_id,
            fixture_id: raw.fixture_id,
            sport_id: raw.sport_id,
            bet_type_id: raw.bet_type_id,
            line: raw.line,
            start_time: raw.start_time,
            expires_at: raw.expires_at,
            currency: raw.currency,
            max_bet: raw.max_bet,
            outcomes,
        })
    }
}

/// A cluster of fixtures believed to quote the same real-world market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub start_time: DateTime<Utc>,
    pub sport_id: u32,
    pub bet_type_id: u32,
    pub line: i32,
    /// Canonical names, taken from the representative fixture
    pub participants: Vec<String>,
    /// Member fixtures, representative first, all aligned to `participants`
    pub fixtures: Vec<Fixture>,
}

impl Event {
    /// Build an event around `representative`; `matched` must already be
    /// aligned to its outcome order.
    pub fn from_cluster(representative: Fixture, matched: Vec<Fixture>) -> Self {
        let participants = representative
            .participants()
            .map(str::to_string)
            .collect();
        let mut fixtures = Vec::with_capacity(matched.len() + 1);
        let (start_time, sport_id, bet_type_id, line) = (
            representative.start_time,
            representative.sport_id,
            representative.bet_type_id,
            representative.line,
        );
        fixtures.push(representative);
        fixtures.extend(matched);
        Event {
            start_time,
            sport_id,
            bet_type_id,
            line,
            participants,
            fixtures,
        }
    }

    pub fn outcome_count(&self) -> usize {
        self.participants.len()
    }

    /// Distinct currencies quoted across member fixtures.
    pub fn currencies(&self) -> BTreeSet<&str> {
        self.fixtures.iter().map(|f| f.currency.as_str()).collect()
    }

    /// "Home vs. Away" style title.
    pub fn title(&self) -> String {
        self.participants.join(" vs. ")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn make_fixture(
        provider_id: u32,
        fixture_id: u32,
        names: &[&str],
        prices: &[f64],
    ) -> Fixture {
        let start = Utc.with_ymd_and_hms(2024, 5, 12, 15, 0, 0).unwrap();
        Fixture {
            provider_id,
            fixture_id,
            sport_id: 1,
            bet_type_id: 1,
            line: 0,
            start_time: start,
            expires_at: start,
            currency: "DKK".into(),
            max_bet: 1000.0,
            outcomes: names
                .iter()
                .zip(prices)
                .map(|(name, price)| Outcome {
                    participant: name.to_string(),
                    price: *price,
                    not_price: 1.0 - price,
                })
                .collect(),
        }
    }

    fn raw(participants: usize, prices: usize, not_prices: usize) -> RawFixture {
        let start = Utc.with_ymd_and_hms(2024, 5, 12, 15, 0, 0).unwrap();
        RawFixture {
            provider_id: 1,
            fixture_id: 7,
            sport_id: 1,
            bet_type_id: 1,
            line: 0,
            start_time: start,
            expires_at: start,
            currency: "EUR".into(),
            max_bet: 50.0,
            participants: (0..participants).map(|i| format!("team {}", i)).collect(),
            prices: vec![0.5; prices],
            not_prices: vec![0.5; not_prices],
        }
    }

    #[test]
    fn test_raw_fixture_converts() {
        let fixture = Fixture::try_from(raw(2, 2, 2)).unwrap();
        assert_eq!(fixture.outcome_count(), 2);
        assert_eq!(fixture.outcomes[1].participant, "team 1");
    }

    #[test]
    fn test_raw_fixture_length_mismatch() {
        let err = Fixture::try_from(raw(3, 2, 3)).unwrap_err();
        assert_eq!(err, ArbError::LengthMismatch { left: 3, right: 2 });
        let err = Fixture::try_from(raw(2, 2, 1)).unwrap_err();
        assert_eq!(err, ArbError::LengthMismatch { left: 2, right: 1 });
    }

    #[test]
    fn test_raw_fixture_from_json_defaults_line() {
        let json = r#"{
            "provider_id": 2, "fixture_id": 9, "sport_id": 1, "bet_type_id": 3,
            "start_time": "2024-05-12T15:00:00Z", "expires_at": "2024-05-12T14:55:00Z",
            "currency": "DKK", "max_bet": 500.0,
            "participants": ["FC København", "Brøndby IF"],
            "prices": [0.45, 0.6], "not_prices": [0.6, 0.45]
        }"#;
        let raw: RawFixture = serde_json::from_str(json).unwrap();
        let fixture = Fixture::try_from(raw).unwrap();
        assert_eq!(fixture.line, 0);
        assert_eq!(fixture.outcomes[0].participant, "FC København");
    }

    #[test]
    fn test_permute_moves_whole_outcomes() {
        let mut f = make_fixture(1, 1, &["a", "b", "c"], &[0.1, 0.2, 0.3]);
        f.permute(&[2, 0, 1]).unwrap();
        let names: Vec<&str> = f.participants().collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(f.outcomes[0].price, 0.3);
        assert_eq!(f.outcomes[1].price, 0.1);
        assert_eq!(f.outcomes[2].price, 0.2);
    }

    #[test]
    fn test_permute_identity_and_swap() {
        let mut f = make_fixture(1, 1, &["a", "b"], &[0.1, 0.2]);
        f.permute(&[0, 1]).unwrap();
        assert_eq!(f.participants().collect::<Vec<_>>(), vec!["a", "b"]);
        f.permute(&[1, 0]).unwrap();
        assert_eq!(f.participants().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(f.outcomes[0].price, 0.2);
    }

    #[test]
    fn test_permute_rejects_wrong_length() {
        let mut f = make_fixture(1, 1, &["a", "b"], &[0.1, 0.2]);
        assert!(f.permute(&[0]).is_err());
    }

    #[test]
    fn test_permute_rejects_repeated_index() {
        let mut f = make_fixture(1, 1, &["a", "b"], &[0.1, 0.2]);
        let err = f.permute(&[1, 1]).unwrap_err();
        assert_eq!(err, ArbError::NotAPermutation { order: vec![1, 1] });
        assert_eq!(f.participants().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(f.permute(&[0, 2]).is_err());
        assert_eq!(f.outcomes[1].price, 0.2);
    }

    #[test]
    fn test_event_from_cluster() {
        let rep = make_fixture(1, 1, &["a", "b"], &[0.4, 0.55]);
        let mut other = make_fixture(2, 5, &["a", "b"], &[0.45, 0.5]);
        other.currency = "EUR".into();
        let event = Event::from_cluster(rep, vec![other]);
        assert_eq!(event.fixtures.len(), 2);
        assert_eq!(event.fixtures[0].provider_id, 1);
        assert_eq!(event.title(), "a vs. b");
        assert_eq!(event.currencies().len(), 2);
    }
}
