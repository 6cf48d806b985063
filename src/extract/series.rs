//! Extract the trailing window of dated values for one indicator.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use super::number::parse_number;
use super::{FIELD_DATE, FIELD_INDICATOR, FIELD_MEASURE, FIELD_VALUE};
use crate::domain::{DatedValue, ExtractionResult, ISO_DATE_FORMAT, Observation};
use crate::error::AppError;

/// Default window size.
pub const DEFAULT_LIMIT: usize = 5;

/// Filter `records`, parse their date/value, sort by date and keep the last `limit`.
///
/// Records that are not objects, fail a matcher, or carry an unparsable date or
/// value are skipped. Only an empty result is an error: it usually means the
/// matcher is too strict or the source renamed the indicator.
///
/// Equal dates keep their source order. A `limit` of 0 is treated as 1.
pub fn extract_last_n<I, M>(
    records: &[Value],
    indicator_match: I,
    measure_match: Option<M>,
    limit: usize,
) -> Result<ExtractionResult, AppError>
where
    I: Fn(&str) -> bool,
    M: Fn(&str) -> bool,
{
    let series = collect_series(records, &indicator_match, measure_match.as_ref());

    if series.is_empty() {
        return Err(AppError::new(
            3,
            "No data found for this indicator (filter too strict, or the source renamed it).",
        ));
    }

    let take = limit.max(1);
    let window = &series[series.len().saturating_sub(take)..];

    let rendered: Vec<Observation> = window.iter().map(Observation::from).collect();
    let latest = rendered
        .last()
        .cloned()
        .ok_or_else(|| AppError::new(3, "No data found for this indicator."))?;

    Ok(ExtractionResult {
        latest,
        window: rendered,
    })
}

/// Matching records as a date-ascending series (stable on equal dates).
pub fn collect_series<I, M>(records: &[Value], indicator_match: &I, measure_match: Option<&M>) -> Vec<DatedValue>
where
    I: Fn(&str) -> bool,
    M: Fn(&str) -> bool,
{
    let mut series = Vec::new();
    let mut skipped = 0usize;

    for item in records {
        let Some(record) = item.as_object() else {
            continue;
        };

        let indicator = record.get(FIELD_INDICATOR).and_then(Value::as_str).unwrap_or("");
        if !indicator_match(indicator) {
            continue;
        }

        if let Some(measure_match) = measure_match {
            let measure = record.get(FIELD_MEASURE).and_then(Value::as_str).unwrap_or("");
            if !measure_match(measure) {
                continue;
            }
        }

        match parse_point(record) {
            Some(point) => series.push(point),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, kept = series.len(), "skipped malformed records");
    }

    // `sort_by_key` is stable.
    series.sort_by_key(|p| p.date);
    series
}

fn parse_point(record: &serde_json::Map<String, Value>) -> Option<DatedValue> {
    let date = record.get(FIELD_DATE).and_then(Value::as_str)?.trim();
    if date.is_empty() {
        return None;
    }
    let raw_value = record.get(FIELD_VALUE).filter(|v| !v.is_null())?;

    let date = NaiveDate::parse_from_str(date, ISO_DATE_FORMAT).ok()?;
    let value = parse_number(raw_value)?;
    Some(DatedValue { date, value })
}
