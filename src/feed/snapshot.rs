use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, warn};

use super::provider::FixtureSource;
use crate::market::{Fixture, RawFixture};

/// Fixture snapshot stored as JSON on disk.
///
/// Accepts either a bare array of fixtures or an object with a `fixtures`
/// array. Records that do not parse, or whose per-outcome arrays disagree in
/// length, are logged and skipped.
pub struct JsonSnapshot {
    path: PathBuf,
}

impl JsonSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonSnapshot { path: path.into() }
    }
}

impl FixtureSource for JsonSnapshot {
    fn name(&self) -> &str {
        "JsonSnapshot"
    }

    fn fetch_fixtures(&self) -> Result<Vec<Fixture>> {
        debug!("Reading fixture snapshot from {}", self.path.display());
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read snapshot {}", self.path.display()))?;
        parse_snapshot(&text)
    }
}

pub fn parse_snapshot(text: &str) -> Result<Vec<Fixture>> {
    let raw: serde_json::Value =
        serde_json::from_str(text).context("Snapshot is not valid JSON")?;

    let records = match raw {
        serde_json::Value::Array(records) => records,
        serde_json::Value::Object(mut obj) => match obj.remove("fixtures") {
            Some(serde_json::Value::Array(records)) => records,
            _ => anyhow::bail!("Snapshot object has no `fixtures` array"),
        },
        _ => anyhow::bail!("Snapshot must be an array of fixtures"),
    };

    let total = records.len();
    let fixtures: Vec<Fixture> = records
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            let raw = match serde_json::from_value::<RawFixture>(record) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Snapshot record {} skipped: {}", idx, e);
                    return None;
                }
            };
            let (provider_id, fixture_id) = (raw.provider_id, raw.fixture_id);
            match Fixture::try_from(raw) {
                Ok(fixture) => Some(fixture),
                Err(e) => {
                    warn!(
                        "Fixture {} from provider {} skipped: {}",
                        fixture_id, provider_id, e
                    );
                    None
                }
            }
        })
        .collect();

    if fixtures.len() < total {
        warn!("Loaded {} of {} snapshot records", fixtures.len(), total);
    }
    Ok(fixtures)
}
