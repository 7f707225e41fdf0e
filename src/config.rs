use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::arb::{RankBy, ScanConfig};
use crate::feed::{DemoFeed, FixtureSource, JsonSnapshot, SnapshotFilter};
use crate::market::MatchConfig;

/// Cross-provider arbitrage scanner for betting fixtures
#[derive(Parser, Debug, Clone)]
#[command(name = "surebet", version, about)]
pub struct Config {
    /// JSON snapshot of provider fixtures to scan
    #[arg(long, env = "SUREBET_INPUT", conflicts_with = "demo")]
    pub input: Option<PathBuf>,

    /// Scan a generated feed with this many markets instead of a snapshot
    #[arg(long, env = "SUREBET_DEMO")]
    pub demo: Option<usize>,

    /// Number of providers quoting each demo market
    #[arg(long, env = "SUREBET_DEMO_PROVIDERS", default_value = "4")]
    pub demo_providers: u32,

    /// RNG seed for a reproducible demo feed
    #[arg(long, env = "SUREBET_SEED")]
    pub seed: Option<u64>,

    /// Largest normalised edit distance at which two participant lists match
    #[arg(long, env = "SIMILARITY_THRESHOLD", default_value = "0.25")]
    pub similarity_threshold: f64,

    /// Skip markets with more outcomes than this
    #[arg(long, env = "MAX_OUTCOMES", default_value = "3")]
    pub max_outcomes: usize,

    /// Ignore fixtures whose event has already started
    #[arg(long, env = "PREMATCH_ONLY", default_value = "false")]
    pub prematch_only: bool,

    /// Order of the reported opportunities
    #[arg(long, env = "RANK_BY", value_enum, default_value = "roi")]
    pub rank_by: RankBy,

    /// Only report events with an ROI (percent) strictly above this
    #[arg(long, env = "MIN_ROI", default_value = "0.0")]
    pub min_roi: f64,

    /// Report at most this many opportunities
    #[arg(long, env = "TOP")]
    pub top: Option<usize>,

    /// Print opportunities as JSON instead of text
    #[arg(long, env = "SUREBET_JSON", default_value = "false")]
    pub json: bool,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        match (&self.input, self.demo) {
            (None, None) => anyhow::bail!("Either --input <path> or --demo <markets> is required"),
            (Some(_), Some(_)) => anyhow::bail!("--input and --demo are mutually exclusive"),
            _ => {}
        }
        if self.demo == Some(0) {
            anyhow::bail!("demo must generate at least one market");
        }
        if self.demo.is_some() && self.demo_providers < 2 {
            anyhow::bail!("demo_providers must be at least 2");
        }
        if !self.similarity_threshold.is_finite() || self.similarity_threshold < 0.0 {
            anyhow::bail!("similarity_threshold must be a non-negative number");
        }
        if self.max_outcomes == 0 {
            anyhow::bail!("max_outcomes must be at least 1");
        }
        if self.min_roi.is_nan() {
            anyhow::bail!("min_roi must be a number");
        }
        if self.top == Some(0) {
            anyhow::bail!("top must be at least 1");
        }
        Ok(())
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            matching: MatchConfig {
                similarity_threshold: self.similarity_threshold,
            },
            rank_by: self.rank_by,
        }
    }

    pub fn filter(&self, now: chrono::DateTime<chrono::Utc>) -> SnapshotFilter {
        SnapshotFilter {
            now,
            max_outcomes: self.max_outcomes,
            prematch_only: self.prematch_only,
        }
    }

    pub fn source(&self) -> Result<Box<dyn FixtureSource>> {
        match (&self.input, self.demo) {
            (Some(path), _) => Ok(Box::new(JsonSnapshot::new(path.clone()))),
            (None, Some(markets)) => Ok(Box::new(DemoFeed::new(
                markets,
                self.demo_providers,
                self.seed,
            ))),
            (None, None) => anyhow::bail!("No fixture source configured"),
        }
    }
}
