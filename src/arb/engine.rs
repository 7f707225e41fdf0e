//! Arbitrage figures for one event.
//!
//! Prices are the stake needed to win one unit, so for a market with
//! outcomes `j`:
//!
//!   arb      = Σ_j best_price[j]
//!   not_arb  = min_j (best_price[j] + best_lay[j])
//!   roi      = 100 / min(arb, not_arb) − 100
//!
//! Backing every outcome at its best price costs `arb` per unit of payout,
//! so `arb < 1` guarantees profit. Backing one outcome and laying it
//! elsewhere costs `best_price[j] + best_lay[j]` for the same unit, which
//! gives the `not_arb` hedge.
use serde::Serialize;

use crate::error::ArbError;
use crate::market::Event;

/// Best price found for one outcome and the member fixture offering it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestQuote {
    pub price: f64,
    /// Index into `Event::fixtures`
    pub fixture: usize,
}

/// Which combination of bets realises the arbitrage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    /// Back every outcome
    Back,
    /// Back and lay the hedge outcome
    Lay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arbitrage {
    /// Best back quote per outcome, `None` when no member quotes it
    pub best_back: Vec<Option<BestQuote>>,
    /// Best lay quote per outcome
    pub best_lay: Vec<Option<BestQuote>>,
    pub arb: f64,
    pub not_arb: f64,
    /// Outcome whose back + lay hedge is cheapest
    pub hedge_outcome: Option<usize>,
    /// Percentage return on a guaranteed-profit stake
    pub roi: f64,
}

impl Arbitrage {
    /// The better of the two figures.
    pub fn figure(&self) -> f64 {
        self.arb.min(self.not_arb)
    }

    pub fn side(&self) -> Side {
        if self.arb <= self.not_arb {
            Side::Back
        } else {
            Side::Lay
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.roi > 0.0
    }
}

/// A price only counts if it is positive and finite.
fn is_quoted(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Lowest quoted price, first fixture wins ties.
fn best_quote(prices: impl Iterator<Item = f64>) -> Option<BestQuote> {
    prices
        .enumerate()
        .filter(|(_, price)| is_quoted(*price))
        .fold(None, |best, (fixture, price)| match best {
            Some(b) if b.price <= price => Some(b),
            _ => Some(BestQuote { price, fixture }),
        })
}

/// Compute the arbitrage figures of `event`.
///
/// Fails when a member fixture disagrees with the event on the number of
/// outcomes; the caller drops that event and keeps going.
pub fn compute_arbitrage(event: &Event) -> Result<Arbitrage, ArbError> {
    let n = event.outcome_count();
    if n == 0 {
        return Err(ArbError::NoOutcomes);
    }
    if let Some(f) = event.fixtures.iter().find(|f| f.outcome_count() != n) {
        return Err(ArbError::OutcomeCountMismatch {
            expected: n,
            found: f.outcome_count(),
            provider_id: f.provider_id,
            fixture_id: f.fixture_id,
        });
    }

    let best_back: Vec<Option<BestQuote>> = (0..n)
        .map(|j| best_quote(event.fixtures.iter().map(|f| f.outcomes[j].price)))
        .collect();
    let best_lay: Vec<Option<BestQuote>> = (0..n)
        .map(|j| best_quote(event.fixtures.iter().map(|f| f.outcomes[j].not_price)))
        .collect();

    let arb: f64 = best_back
        .iter()
        .map(|q| q.map_or(f64::INFINITY, |q| q.price))
        .sum();

    let mut not_arb = f64::INFINITY;
    let mut hedge_outcome = None;
    for (j, (back, lay)) in best_back.iter().zip(&best_lay).enumerate() {
        if let (Some(back), Some(lay)) = (back, lay) {
            let cost = back.price + lay.price;
            if cost < not_arb {
                not_arb = cost;
                hedge_outcome = Some(j);
            }
        }
    }

    let roi = 100.0 / arb.min(not_arb) - 100.0;

    Ok(Arbitrage {
        best_back,
        best_lay,
        arb,
        not_arb,
        hedge_outcome,
        roi,
    })
}
