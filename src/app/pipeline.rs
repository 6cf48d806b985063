//! Shared snapshot pipeline used by the `run` and `parse` commands.
//!
//! feed document -> record list -> one extraction per indicator -> optional oil -> snapshot
//!
//! Extraction failures are fatal. The oil quote is best-effort: when it is not
//! configured or cannot be fetched the `petroleo` entry is simply left out.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::data::{BceClient, FredClient};
use crate::domain::{IndicatorSpec, IndicatorValue, LatestValue, Snapshot, SnapshotConfig, TIMESTAMP_FORMAT};
use crate::error::AppError;
use crate::extract::{extract_last_n, find_records};

pub const OIL_KEY: &str = "petroleo";
pub const SOURCE_BCE_KEY: &str = "source_bce";
pub const SOURCE_OIL_KEY: &str = "source_petroleo";

/// A single-value quote from the secondary source.
#[derive(Debug, Clone)]
pub struct OilQuote {
    pub source: String,
    pub value: LatestValue,
}

/// Fetch everything and assemble the snapshot.
pub fn run_snapshot(config: &SnapshotConfig, indicators: &[IndicatorSpec]) -> Result<Snapshot, AppError> {
    let client = BceClient::new(&config.source_url, config.timeout)?;
    let document = client.fetch_document()?;

    // Extract before touching the optional source so a bad feed fails fast.
    let entries = extract_indicators(&document, indicators, config.limit)?;
    let oil = fetch_oil(config);

    Ok(assemble(entries, oil, client.url(), Utc::now()))
}

/// Assemble a snapshot from a saved feed document (no network, no oil).
pub fn snapshot_from_file(path: &Path, indicators: &[IndicatorSpec], limit: usize) -> Result<Snapshot, AppError> {
    let document = crate::io::read_document_json(path)?;
    build_snapshot(&document, indicators, None, &path.display().to_string(), limit, Utc::now())
}

/// Pure assembly: locate records, extract every indicator, attach provenance.
pub fn build_snapshot(
    document: &Value,
    indicators: &[IndicatorSpec],
    oil: Option<OilQuote>,
    source: &str,
    limit: usize,
    now: DateTime<Utc>,
) -> Result<Snapshot, AppError> {
    let entries = extract_indicators(document, indicators, limit)?;
    Ok(assemble(entries, oil, source, now))
}

/// Run one extraction per indicator over the document's record list.
pub fn extract_indicators(
    document: &Value,
    indicators: &[IndicatorSpec],
    limit: usize,
) -> Result<Vec<(String, IndicatorValue)>, AppError> {
    let records = find_records(document).ok_or_else(|| {
        AppError::new(
            4,
            "Could not find the record list (Indicador/Fecha/Valor) inside the source JSON.",
        )
    })?;
    info!(records = records.len(), "record list located");

    let mut entries = Vec::with_capacity(indicators.len());
    for spec in indicators {
        let result = extract_last_n(records, spec.indicator, spec.measure, limit)
            .map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", spec.label)))?;
        info!(
            indicator = spec.key,
            points = result.window.len(),
            latest = %result.latest.valor,
            date = %result.latest.fecha_iso,
            "indicator extracted"
        );
        entries.push((spec.key.to_string(), IndicatorValue::Series(result)));
    }
    Ok(entries)
}

/// Fetch the oil quote if configured. Never fails the run.
pub fn fetch_oil(config: &SnapshotConfig) -> Option<OilQuote> {
    let Some(oil) = &config.oil else {
        info!("oil source not configured; skipping");
        return None;
    };

    let fetched = FredClient::new(oil.api_key.as_str(), config.timeout)
        .and_then(|c| c.with_base_url(oil.base_url.as_str()).fetch_latest(&oil.series_id));
    match fetched {
        Ok(value) => Some(OilQuote {
            source: FredClient::series_url(&oil.series_id),
            value,
        }),
        Err(e) => {
            warn!(series_id = %oil.series_id, error = %e, "oil quote unavailable; omitting");
            None
        }
    }
}

fn assemble(
    mut indicators: Vec<(String, IndicatorValue)>,
    oil: Option<OilQuote>,
    source: &str,
    now: DateTime<Utc>,
) -> Snapshot {
    let mut sources = vec![(SOURCE_BCE_KEY.to_string(), source.to_string())];

    if let Some(oil) = oil {
        indicators.push((OIL_KEY.to_string(), IndicatorValue::Latest(oil.value)));
        sources.push((SOURCE_OIL_KEY.to_string(), oil.source));
    }

    Snapshot {
        indicators,
        sources,
        generated_at_utc: now.format(TIMESTAMP_FORMAT).to_string(),
    }
}
