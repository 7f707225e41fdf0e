use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use surebet::arb::scan;
use surebet::config::Config;
use surebet::report::{format_opportunity, OpportunityReport};

fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    let source = config.source()?;
    let fixtures = source
        .fetch_fixtures()
        .with_context(|| format!("Fetching fixtures from {}", source.name()))?;
    info!("{} delivered {} fixture(s)", source.name(), fixtures.len());

    let fixtures = config.filter(chrono::Utc::now()).apply(fixtures);
    info!("{} fixture(s) left after filtering", fixtures.len());

    let result = scan(fixtures, &config.scan_config());
    if !result.rejected.is_empty() {
        warn!("{} event(s) could not be priced", result.rejected.len());
    }

    let top = config.top.unwrap_or(usize::MAX);
    let opportunities: Vec<_> = result
        .ranked
        .iter()
        .filter(|p| p.arbitrage.roi > config.min_roi)
        .take(top)
        .collect();

    info!(
        "Scanned {} fixture(s) into {} event(s): {} profitable, {} reported",
        result.fixture_count(),
        result.ranked.len() + result.rejected.len(),
        result.profitable().count(),
        opportunities.len()
    );

    if config.json {
        let reports: Vec<OpportunityReport> = opportunities
            .iter()
            .enumerate()
            .map(|(i, p)| OpportunityReport::new(i + 1, p))
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for (i, priced) in opportunities.iter().enumerate() {
            println!("{}", format_opportunity(i + 1, priced, &priced.stake_plan()));
        }
        if opportunities.is_empty() {
            info!("No opportunities above {:.2}% ROI", config.min_roi);
        }
    }

    Ok(())
}
