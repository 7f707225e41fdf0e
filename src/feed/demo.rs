use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::provider::FixtureSource;
use crate::market::{Fixture, Outcome};

/// How each provider might spell a club. Variants stay within a few edits of
/// each other so they still match across providers.
const CLUBS: &[&[&str]] = &[
    &["FC København", "FC Kobenhavn", "FC København."],
    &["Brøndby IF", "Brondby IF", "Brøndby IF."],
    &["Fremad Amager", "fremad Amager", "Fremad Amager."],
    &["FC Midtjylland", "FC Midtjyland", "FC. Midtjylland"],
    &["AGF Aarhus", "AGF Aarhus.", "AGF  Aarhus"],
    &["Randers FC", "Randers F.C.", "Randers FC."],
    &["Silkeborg IF", "Silkeborg I.F.", "SIlkeborg IF"],
    &["Viborg FF", "Viborg F.F.", "Viborg FF."],
    &["Lyngby BK", "Lyngby B.K.", "Lyngby BK."],
    &["Vejle BK", "Vejle B.K.", "Vejle BK."],
    &["OB Odense", "OB Odense.", "OB  Odense"],
    &["FC Nordsjælland", "FC Nordsjaelland", "F.C. Nordsjælland"],
];

/// Bookmaker margin folded into every quoted price
const MARGIN: f64 = 0.02;
/// Per-provider price noise; wide enough that cross-provider arbs show up
const PRICE_NOISE: f64 = 0.07;
const MAX_BETS: [f64; 4] = [250.0, 500.0, 1000.0, 2500.0];
const CURRENCIES: [&str; 2] = ["DKK", "EUR"];
/// Markets share these kickoff slots, so one exact-key bucket can hold
/// several matchups
const KICKOFF_SLOTS: usize = 3;

/// Synthetic feed: every provider quotes every market, each with its own
/// spelling, outcome order and price noise.
pub struct DemoFeed {
    markets: usize,
    providers: u32,
    seed: Option<u64>,
    start: DateTime<Utc>,
}

impl DemoFeed {
    pub fn new(markets: usize, providers: u32, seed: Option<u64>) -> Self {
        DemoFeed {
            markets,
            providers,
            seed,
            start: Utc::now() + Duration::hours(2),
        }
    }

    /// First kickoff slot; the others follow every 15 minutes.
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn generate(&self, rng: &mut StdRng) -> Vec<Fixture> {
        let mut fixtures = Vec::with_capacity(self.markets * self.providers as usize);
        let mut next_id = vec![1u32; self.providers as usize];

        for market in 0..self.markets {
            let outcomes = rng.gen_range(2..=3usize);
            let clubs: Vec<&[&str]> = CLUBS.choose_multiple(rng, outcomes).copied().collect();
            let weights: Vec<f64> = (0..outcomes).map(|_| rng.gen_range(1.0..10.0)).collect();
            let total: f64 = weights.iter().sum();
            let slot = (market % KICKOFF_SLOTS) as i64;
            let start_time = self.start + Duration::minutes(15 * slot);
            let sport_id = rng.gen_range(0..3u32);

            for (p, provider_id) in (1..=self.providers).enumerate() {
                let mut quoted: Vec<Outcome> = clubs
                    .iter()
                    .zip(&weights)
                    .map(|(variants, w)| {
                        let prob = w / total;
                        let back = prob * (1.0 + MARGIN) * noise(rng);
                        let lay = (1.0 - prob) * (1.0 + MARGIN) * noise(rng);
                        Outcome {
                            participant: variants[rng.gen_range(0..variants.len())].to_string(),
                            price: back.clamp(0.01, 0.99),
                            not_price: lay.clamp(0.01, 0.99),
                        }
                    })
                    .collect();
                quoted.shuffle(rng);

                fixtures.push(Fixture {
                    provider_id,
                    fixture_id: next_id[p],
                    sport_id,
                    bet_type_id: outcomes as u32,
                    line: 0,
                    start_time,
                    expires_at: start_time - Duration::minutes(5),
                    currency: CURRENCIES[p % CURRENCIES.len()].to_string(),
                    max_bet: MAX_BETS[rng.gen_range(0..MAX_BETS.len())],
                    outcomes: quoted,
                });
                next_id[p] += 1;
            }
        }
        fixtures
    }
}

fn noise(rng: &mut StdRng) -> f64 {
    rng.gen_range(1.0 - PRICE_NOISE..1.0 + PRICE_NOISE)
}

impl FixtureSource for DemoFeed {
    fn name(&self) -> &str {
        "DemoFeed"
    }

    fn fetch_fixtures(&self) -> Result<Vec<Fixture>> {
        let fixtures = self.generate(&mut self.rng());
        debug!(
            "Generated {} demo fixtures across {} markets and {} providers",
            fixtures.len(),
            self.markets,
            self.providers
        );
        Ok(fixtures)
    }
}
