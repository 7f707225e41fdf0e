//! Stake sizing for a priced event.
//!
//! With a figure `F` (the cheaper of `arb` / `not_arb`) and a bankroll `B`,
//! each leg `k` gets
//!
//!   stake_k = B · price_k / F
//!
//! so every leg pays out `stake_k / price_k = B / F` and the guaranteed
//! profit is `B / F − B`. The bankroll is the largest one that keeps every
//! leg within its provider's bet limit:
//!
//!   B = min_k ( max_bet_k · F / price_k )
use serde::Serialize;

use super::engine::{BestQuote, Side};
use super::scan::PricedEvent;

/// One bet to place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeLeg {
    pub outcome: usize,
    pub side: Side,
    pub provider_id: u32,
    pub fixture_id: u32,
    pub price: f64,
    pub stake: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakePlan {
    pub side: Side,
    /// Total stake across all legs
    pub bankroll: f64,
    /// Amount returned whichever outcome happens
    pub payout: f64,
    pub guaranteed_profit: f64,
    pub legs: Vec<StakeLeg>,
}

impl StakePlan {
    fn empty(side: Side) -> Self {
        StakePlan {
            side,
            bankroll: 0.0,
            payout: 0.0,
            guaranteed_profit: 0.0,
            legs: Vec::new(),
        }
    }

    pub fn stakes(&self) -> Vec<f64> {
        self.legs.iter().map(|leg| leg.stake).collect()
    }
}

/// Provider limits are trusted only when they are positive numbers.
fn bet_limit(max_bet: f64) -> f64 {
    if max_bet.is_nan() {
        return 0.0;
    }
    max_bet.max(0.0)
}

/// Split the largest bankroll the provider limits allow across the legs of
/// the better arbitrage side.
///
/// Back side: one back bet per outcome at its best price. Lay side: back and
/// lay the hedge outcome, each with the provider quoting the best price.
pub fn optimize_stakes(priced: &PricedEvent) -> StakePlan {
    let arb = &priced.arbitrage;
    let side = arb.side();
    let figure = arb.figure();
    if !figure.is_finite() || figure <= 0.0 {
        return StakePlan::empty(side);
    }

    let quotes: Option<Vec<(usize, Side, BestQuote)>> = match side {
        Side::Back => arb
            .best_back
            .iter()
            .enumerate()
            .map(|(j, q)| q.map(|q| (j, Side::Back, q)))
            .collect(),
        Side::Lay => arb.hedge_outcome.and_then(|h| {
            let back = arb.best_back.get(h).copied().flatten()?;
            let lay = arb.best_lay.get(h).copied().flatten()?;
            Some(vec![(h, Side::Back, back), (h, Side::Lay, lay)])
        }),
    };
    let Some(quotes) = quotes else {
        return StakePlan::empty(side);
    };

    let fixtures = &priced.event.fixtures;
    let bankroll = quotes
        .iter()
        .map(|(_, _, q)| bet_limit(fixtures[q.fixture].max_bet) * figure / q.price)
        .fold(f64::INFINITY, f64::min);
    if !bankroll.is_finite() {
        return StakePlan::empty(side);
    }

    let legs = quotes
        .into_iter()
        .map(|(outcome, leg_side, q)| {
            let fixture = &fixtures[q.fixture];
            StakeLeg {
                outcome,
                side: leg_side,
                provider_id: fixture.provider_id,
                fixture_id: fixture.fixture_id,
                price: q.price,
                stake: bankroll * q.price / figure,
                currency: fixture.currency.clone(),
            }
        })
        .collect();

    let payout = bankroll / figure;
    StakePlan {
        side,
        bankroll,
        payout,
        guaranteed_profit: payout - bankroll,
        legs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::engine::tests::{lay_side_event, two_provider_event};
    use crate::market::models::tests::make_fixture;
    use crate::market::Event;
    use approx::assert_relative_eq;

    fn price(event: Event) -> PricedEvent {
        PricedEvent::price(event).unwrap()
    }

    #[test]
    fn test_back_side_equal_payout() {
        let plan = optimize_stakes(&price(two_provider_event()));
        let stakes = plan.stakes();
        assert_eq!(plan.side, Side::Back);
        assert_eq!(stakes.len(), 2);
        assert_relative_eq!(stakes[0] / 0.4, stakes[1] / 0.5, epsilon = 1e-9);
        assert!(plan.guaranteed_profit > 0.0);
    }

    #[test]
    fn test_back_side_respects_limits() {
        // Bankroll 1800: the 0.5 leg hits its 1000 limit first.
        let plan = optimize_stakes(&price(two_provider_event()));
        assert_relative_eq!(plan.bankroll, 1800.0, epsilon = 1e-9);
        assert_relative_eq!(plan.legs[0].stake, 800.0, epsilon = 1e-9);
        assert_relative_eq!(plan.legs[1].stake, 1000.0, epsilon = 1e-9);
        assert_relative_eq!(plan.payout, 2000.0, epsilon = 1e-9);
        assert_relative_eq!(plan.guaranteed_profit, 200.0, epsilon = 1e-9);
        assert_eq!(plan.legs[0].provider_id, 1);
        assert_eq!(plan.legs[1].provider_id, 2);
        for leg in &plan.legs {
            assert!(leg.stake <= 1000.0 + 1e-9);
        }
    }

    #[test]
    fn test_lay_side_two_legs() {
        let plan = optimize_stakes(&price(lay_side_event()));
        assert_eq!(plan.side, Side::Lay);
        assert_eq!(plan.legs.len(), 2);

        let (back, lay) = (&plan.legs[0], &plan.legs[1]);
        assert_eq!((back.side, back.outcome, back.provider_id), (Side::Back, 0, 2));
        assert_eq!((lay.side, lay.outcome, lay.provider_id), (Side::Lay, 0, 1));

        // Provider 1 only takes 100, which caps the whole hedge.
        assert_relative_eq!(lay.stake, 100.0, epsilon = 1e-9);
        assert_relative_eq!(back.stake / 0.55, lay.stake / 0.3, epsilon = 1e-9);
        assert_relative_eq!(plan.bankroll, 100.0 * 0.85 / 0.3, epsilon = 1e-9);
        assert_relative_eq!(
            plan.guaranteed_profit,
            plan.bankroll / 0.85 - plan.bankroll,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_no_profit_without_edge() {
        let f = make_fixture(1, 1, &["Home", "Away"], &[0.25, 0.75]);
        let plan = optimize_stakes(&price(Event::from_cluster(f, vec![])));
        assert_relative_eq!(plan.guaranteed_profit, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_limit_means_no_stake() {
        let mut event = two_provider_event();
        event.fixtures[1].max_bet = 0.0;
        let plan = optimize_stakes(&price(event));
        assert_relative_eq!(plan.bankroll, 0.0);
        assert!(plan.stakes().iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_unbounded_limits_give_empty_plan() {
        let mut event = two_provider_event();
        for f in &mut event.fixtures {
            f.max_bet = f64::INFINITY;
        }
        let plan = optimize_stakes(&price(event));
        assert!(plan.legs.is_empty());
        assert_eq!(plan.bankroll, 0.0);
    }

    #[test]
    fn test_unpriceable_market_gives_empty_plan() {
        let mut f = make_fixture(1, 1, &["Home", "Away"], &[0.4, 0.0]);
        for o in &mut f.outcomes {
            o.not_price = 0.0;
        }
        let plan = optimize_stakes(&price(Event::from_cluster(f, vec![])));
        assert!(plan.legs.is_empty());
        assert_eq!(plan.guaranteed_profit, 0.0);
    }
}
