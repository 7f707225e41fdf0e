use serde::Serialize;
use std::fmt::Write;

use crate::arb::{Arbitrage, PricedEvent, Side, StakePlan};

/// Render one ranked opportunity as a block of text.
pub fn format_opportunity(rank: usize, priced: &PricedEvent, plan: &StakePlan) -> String {
    let event = &priced.event;
    let arb = &priced.arbitrage;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "#{} {} | {} | sport {} bet type {} line {}",
        rank,
        event.title(),
        event.start_time.format("%Y-%m-%d %H:%M UTC"),
        event.sport_id,
        event.bet_type_id,
        event.line
    );
    let _ = writeln!(
        out,
        "   arb {:.4}  not_arb {:.4}  roi {:+.2}%  side {:?}  ({} fixture(s))",
        arb.arb,
        arb.not_arb,
        arb.roi,
        plan.side,
        event.fixtures.len()
    );

    for leg in &plan.legs {
        let name = event
            .participants
            .get(leg.outcome)
            .map(String::as_str)
            .unwrap_or("?");
        let verb = match leg.side {
            Side::Back => "back",
            Side::Lay => "lay ",
        };
        let _ = writeln!(
            out,
            "   {} {:<24} @ {:.4}  stake {:>10.2} {}  (provider {}, fixture {})",
            verb, name, leg.price, leg.stake, leg.currency, leg.provider_id, leg.fixture_id
        );
    }

    if plan.legs.is_empty() {
        let reason = if arb.figure().is_finite() {
            "provider bet limits are unbounded"
        } else {
            "market not fully quoted"
        };
        let _ = writeln!(out, "   no stake plan: {}", reason);
    } else {
        let _ = writeln!(
            out,
            "   bankroll {:.2}  payout {:.2}  profit {:.2}",
            plan.bankroll, plan.payout, plan.guaranteed_profit
        );
    }

    let currencies = leg_currencies(plan);
    if currencies.len() > 1 {
        let _ = writeln!(
            out,
            "   ⚠️  mixed currencies ({}): convert before staking",
            currencies.join(", ")
        );
    }
    out
}

fn leg_currencies(plan: &StakePlan) -> Vec<&str> {
    let mut currencies: Vec<&str> = plan.legs.iter().map(|l| l.currency.as_str()).collect();
    currencies.sort_unstable();
    currencies.dedup();
    currencies
}

/// One opportunity in `--json` output.
#[derive(Debug, Serialize)]
pub struct OpportunityReport<'a> {
    pub rank: usize,
    pub title: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub sport_id: u32,
    pub bet_type_id: u32,
    pub line: i32,
    pub participants: &'a [String],
    pub fixtures: usize,
    pub arbitrage: &'a Arbitrage,
    pub stake_plan: StakePlan,
    pub mixed_currencies: bool,
}

impl<'a> OpportunityReport<'a> {
    pub fn new(rank: usize, priced: &'a PricedEvent) -> Self {
        let event = &priced.event;
        let stake_plan = priced.stake_plan();
        let mixed_currencies = leg_currencies(&stake_plan).len() > 1;
        OpportunityReport {
            rank,
            title: event.title(),
            start_time: event.start_time,
            sport_id: event.sport_id,
            bet_type_id: event.bet_type_id,
            line: event.line,
            participants: &event.participants,
            fixtures: event.fixtures.len(),
            arbitrage: &priced.arbitrage,
            stake_plan,
            mixed_currencies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::engine::tests::two_provider_event;

    fn priced() -> PricedEvent {
        PricedEvent::price(two_provider_event()).unwrap()
    }

    #[test]
    fn test_format_single_currency() {
        let p = priced();
        let text = format_opportunity(1, &p, &p.stake_plan());
        assert!(text.starts_with("#1 Home vs. Away"));
        assert!(text.contains("roi +11.11%"));
        assert!(text.contains("back Home"));
        assert!(text.contains("profit 200.00"));
        assert!(!text.contains("mixed currencies"));
    }

    #[test]
    fn test_mixed_currencies_flagged() {
        let mut event = two_provider_event();
        event.fixtures[1].currency = "EUR".into();
        let p = PricedEvent::price(event).unwrap();
        let text = format_opportunity(2, &p, &p.stake_plan());
        assert!(text.contains("mixed currencies (DKK, EUR)"));
        assert!(OpportunityReport::new(2, &p).mixed_currencies);
    }

    #[test]
    fn test_empty_plan_reason() {
        let mut event = two_provider_event();
        for f in &mut event.fixtures {
            f.max_bet = f64::INFINITY;
        }
        let p = PricedEvent::price(event).unwrap();
        let text = format_opportunity(1, &p, &p.stake_plan());
        assert!(text.contains("no stake plan: provider bet limits are unbounded"));

        let mut event = two_provider_event();
        for f in &mut event.fixtures {
            f.outcomes[1].price = 0.0;
            for o in &mut f.outcomes {
                o.not_price = 0.0;
            }
        }
        let p = PricedEvent::price(event).unwrap();
        let text = format_opportunity(1, &p, &p.stake_plan());
        assert!(text.contains("no stake plan: market not fully quoted"));
    }

    #[test]
    fn test_json_report() {
        let p = priced();
        let json = serde_json::to_value(OpportunityReport::new(1, &p)).unwrap();
        assert_eq!(json["title"], "Home vs. Away");
        assert_eq!(json["stake_plan"]["side"], "Back");
        assert_eq!(json["stake_plan"]["legs"].as_array().unwrap().len(), 2);
        assert_eq!(json["mixed_currencies"], false);
    }
}
